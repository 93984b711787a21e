use anyhow::{Context, Result};
use clap::Parser;
use fuzzfleet::cli::{Cli, Commands};
use fuzzfleet::{config, SyscallCatalog};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let catalog = SyscallCatalog::x86_64();

    match args.command {
        Commands::Check { config: path } => {
            let (cfg, syscalls) = config::parse(&path, &catalog)
                .with_context(|| format!("invalid config {}", path.display()))?;
            println!(
                "{}: type={} count={} procs={} syscalls={}/{} suppressions={} ignores={}",
                path.display(),
                cfg.instance_type,
                cfg.count,
                cfg.procs,
                syscalls.len(),
                catalog.len(),
                cfg.suppressions.len(),
                cfg.ignores.len()
            );
        }
        Commands::Syscalls { config: path } => {
            let (_, syscalls) = config::parse(&path, &catalog)
                .with_context(|| format!("invalid config {}", path.display()))?;
            for name in syscalls.names(&catalog) {
                println!("{}", name);
            }
        }
        Commands::Instances { config: path, index } => {
            let (cfg, _) = config::parse(&path, &catalog)
                .with_context(|| format!("invalid config {}", path.display()))?;
            let json = match index {
                Some(i) => {
                    let instance = cfg
                        .instance_config(i)
                        .context("failed to create instance config")?;
                    serde_json::to_string_pretty(&instance)?
                }
                None => {
                    let instances = cfg
                        .instance_configs()
                        .context("failed to create instance configs")?;
                    serde_json::to_string_pretty(&instances)?
                }
            };
            println!("{}", json);
        }
    }

    Ok(())
}
