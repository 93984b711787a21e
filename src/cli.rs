//! CLI argument parsing for fuzzfleet

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fuzzfleet")]
#[command(version)]
#[command(about = "Validate kernel fuzzing fleet configs and derive instance settings", long_about = None)]
pub struct Cli {
    /// Enable debug logging to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a config and print a summary
    Check {
        /// Path to the config file (JSON, or TOML by extension)
        config: PathBuf,
    },

    /// Print the syscalls fuzzers are allowed to use
    Syscalls {
        /// Path to the config file
        config: PathBuf,
    },

    /// Print per-instance launch configs as JSON
    Instances {
        /// Path to the config file
        config: PathBuf,

        /// Only this instance
        #[arg(long = "index", value_name = "N")]
        index: Option<usize>,
    },
}
