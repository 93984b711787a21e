//! Fleet configuration: loading, validation and normalization
//!
//! `parse` reads a config file, applies defaults, runs the checks for the
//! configured instance type, resolves paths against the working directory and
//! derives the permitted syscall set. The first violated rule aborts.

mod raw;
mod types;

pub use raw::RawConfig;
pub use types::{InstanceType, OutputMode, Sandbox, MAX_VM_COUNT};

use crate::error::{ConfigError, Result};
use crate::filter::{SyscallFilter, SyscallSet};
use crate::suppressions;
use crate::syscalls::SyscallCatalog;
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Upper bound on fuzzer processes per instance
pub const MAX_PROCS: i64 = 32;

/// RPC address used when none is configured
pub const DEFAULT_RPC: &str = "localhost:0";

const FUZZER_BIN: &str = "bin/syz-fuzzer";
const EXECUTOR_BIN: &str = "bin/syz-executor";

/// Address and key of an optional reporting service (hub or dashboard)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub addr: String,
    pub key: String,
}

/// Odroid board wiring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OdroidConfig {
    /// IP address of the host machine
    pub host_addr: String,
    /// IP address of the board
    pub slave_addr: String,
    /// Console device, e.g. "/dev/ttyUSB0"
    pub console: String,
    pub hub_bus: i32,
    pub hub_device: i32,
    /// Port on the USB hub the board is connected to
    pub hub_port: i32,
}

/// Validated fleet configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    pub http: String,
    pub rpc: String,
    pub workdir: PathBuf,
    pub vmlinux: PathBuf,
    pub kernel: Option<PathBuf>,
    pub tag: String,
    pub cmdline: String,
    pub image: String,
    pub initrd: Option<PathBuf>,
    pub cpu: u32,
    pub mem: u64,
    pub sshkey: Option<PathBuf>,
    pub bin: Option<PathBuf>,
    pub bin_args: String,
    pub debug: bool,
    pub output: OutputMode,

    pub hub: Option<Endpoint>,
    pub dashboard: Option<Endpoint>,

    pub syzkaller: PathBuf,
    pub instance_type: InstanceType,
    pub count: usize,
    pub devices: Vec<String>,
    pub procs: usize,
    pub sandbox: Sandbox,

    pub machine_type: String,
    pub odroid: OdroidConfig,

    pub cover: bool,
    pub leak: bool,
    pub reproduce: bool,

    pub enable_syscalls: Vec<String>,
    pub disable_syscalls: Vec<String>,
    pub suppressions: Vec<Regex>,
    pub ignores: Vec<Regex>,
}

/// Load and validate a config file against a syscall catalog
///
/// Relative paths are resolved against the process working directory.
pub fn parse<P: AsRef<Path>>(path: P, catalog: &SyscallCatalog) -> Result<(Config, SyscallSet)> {
    let raw = RawConfig::load(path)?;
    let cwd = std::env::current_dir().map_err(ConfigError::CurrentDir)?;
    Config::from_raw(raw, catalog, &cwd)
}

impl Config {
    /// Validate a raw record, resolving relative paths against `cwd`
    pub fn from_raw(
        raw: RawConfig,
        catalog: &SyscallCatalog,
        cwd: &Path,
    ) -> Result<(Config, SyscallSet)> {
        let syzkaller = absolutize(&raw.syzkaller, cwd)
            .ok_or_else(|| ConfigError::missing("syzkaller", "required"))?;
        for bin in [FUZZER_BIN, EXECUTOR_BIN] {
            let path = syzkaller.join(bin);
            if !path.exists() {
                return Err(ConfigError::MissingBinary { path });
            }
        }
        let required = [
            ("http", &raw.http),
            ("workdir", &raw.workdir),
            ("vmlinux", &raw.vmlinux),
            ("type", &raw.instance_type),
        ];
        for (field, value) in required {
            if value.is_empty() {
                return Err(ConfigError::missing(field, "required"));
            }
        }

        let instance_type = InstanceType::parse(&raw.instance_type)?;
        let count = instance_type.check(&raw)?;

        let rpc = if raw.rpc.is_empty() {
            DEFAULT_RPC.to_string()
        } else {
            raw.rpc.clone()
        };
        let procs = match raw.procs {
            p if p <= 0 => 1,
            p if p > MAX_PROCS => {
                return Err(ConfigError::OutOfRange {
                    field: "procs",
                    value: p,
                    range: "at most 32",
                })
            }
            p => p as usize,
        };
        let output = if raw.output.is_empty() {
            instance_type.default_output()
        } else {
            OutputMode::parse(&raw.output)?
        };
        let sandbox = Sandbox::parse(&raw.sandbox)?;

        let syscalls =
            SyscallFilter::new(&raw.enable_syscalls, &raw.disable_syscalls).resolve(catalog)?;
        let suppressions = suppressions::compile_suppressions(&raw.suppressions)?;
        let ignores = suppressions::compile_ignores(&raw.ignores)?;

        let hub = endpoint(
            &raw.name,
            ("hub_addr", raw.hub_addr.as_str()),
            ("hub_key", raw.hub_key.as_str()),
        )?;
        let dashboard = endpoint(
            &raw.name,
            ("dashboard_addr", raw.dashboard_addr.as_str()),
            ("dashboard_key", raw.dashboard_key.as_str()),
        )?;

        let cfg = Config {
            workdir: absolutize(&raw.workdir, cwd).unwrap_or_default(),
            vmlinux: absolutize(&raw.vmlinux, cwd).unwrap_or_default(),
            kernel: absolutize(&raw.kernel, cwd),
            initrd: absolutize(&raw.initrd, cwd),
            sshkey: absolutize(&raw.sshkey, cwd),
            bin: absolutize(&raw.bin, cwd),
            syzkaller,
            name: raw.name,
            http: raw.http,
            rpc,
            tag: raw.tag,
            cmdline: raw.cmdline,
            image: raw.image,
            cpu: raw.cpu,
            mem: raw.mem,
            bin_args: raw.bin_args,
            debug: raw.debug,
            output,
            hub,
            dashboard,
            instance_type,
            count,
            devices: raw.devices,
            procs,
            sandbox,
            machine_type: raw.machine_type,
            odroid: OdroidConfig {
                host_addr: raw.odroid_host_addr,
                slave_addr: raw.odroid_slave_addr,
                console: raw.odroid_console,
                hub_bus: raw.odroid_hub_bus,
                hub_device: raw.odroid_hub_device,
                hub_port: raw.odroid_hub_port,
            },
            cover: raw.cover,
            leak: raw.leak,
            reproduce: raw.reproduce,
            enable_syscalls: raw.enable_syscalls,
            disable_syscalls: raw.disable_syscalls,
            suppressions,
            ignores,
        };
        tracing::debug!(
            instance_type = %cfg.instance_type,
            count = cfg.count,
            syscalls = syscalls.len(),
            "config validated"
        );
        Ok((cfg, syscalls))
    }

    pub fn fuzzer_path(&self) -> PathBuf {
        self.syzkaller.join(FUZZER_BIN)
    }

    pub fn executor_path(&self) -> PathBuf {
        self.syzkaller.join(EXECUTOR_BIN)
    }

    /// Report should not be saved, but the instance restarted
    pub fn is_suppressed(&self, report: &str) -> bool {
        suppressions::matches_any(&self.suppressions, report)
    }

    /// Report should be dropped entirely
    pub fn is_ignored(&self, report: &str) -> bool {
        suppressions::matches_any(&self.ignores, report)
    }
}

/// Params are `(field, value)` pairs, the addr gates the name and key
fn endpoint(
    name: &str,
    (addr_field, addr): (&'static str, &str),
    (key_field, key): (&'static str, &str),
) -> Result<Option<Endpoint>> {
    if addr.is_empty() {
        return Ok(None);
    }
    if name.is_empty() {
        return Err(ConfigError::missing("name", format!("{addr_field} is set")));
    }
    if key.is_empty() {
        return Err(ConfigError::missing(key_field, format!("{addr_field} is set")));
    }
    Ok(Some(Endpoint {
        addr: addr.to_string(),
        key: key.to_string(),
    }))
}

/// Resolve a config path against `cwd`
///
/// Empty paths mean "unset" and give `None`. Absolute paths are returned
/// unchanged, relative ones are joined to `cwd` and lexically cleaned.
pub fn absolutize(path: &str, cwd: &Path) -> Option<PathBuf> {
    if path.is_empty() {
        return None;
    }
    let path = Path::new(path);
    if path.is_absolute() {
        return Some(path.to_path_buf());
    }
    let mut out = PathBuf::new();
    for component in cwd.join(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    Some(out)
}
