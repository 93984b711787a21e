//! Fuzzfleet - validation and derivation of kernel fuzzing fleet configurations
//!
//! A fleet config describes a set of isolated instances (VMs or devices), each
//! running a fuzzer. This library validates such a config, normalizes it, and
//! derives the syscalls fuzzers may use and the launch config of each instance.

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod instance;
pub mod suppressions;
pub mod syscalls;
pub mod workdir;

pub use config::{parse, Config};
pub use error::{ConfigError, Result};
pub use filter::{SyscallFilter, SyscallSet};
pub use instance::InstanceConfig;
pub use syscalls::{SyscallCatalog, SyscallDesc};
