//! Raw config record as read from disk, before any validation
//!
//! JSON is the native format. Files ending in `.toml` are read as TOML.
//! Unknown keys are rejected so typos do not silently fall back to defaults.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// Instance name, used for identification and as GCE instance prefix
    pub name: String,
    /// TCP address to serve the HTTP stats page on
    pub http: String,
    /// TCP address to serve RPC for fuzzer processes
    pub rpc: String,
    pub workdir: String,
    pub vmlinux: String,
    pub kernel: String,
    /// Free-form tag saved along with crash reports
    pub tag: String,
    pub cmdline: String,
    pub image: String,
    pub initrd: String,
    pub cpu: u32,
    /// VM memory in MB
    pub mem: u64,
    pub sshkey: String,
    /// qemu/lkvm binary
    pub bin: String,
    pub bin_args: String,
    pub debug: bool,
    pub output: String,

    pub hub_addr: String,
    pub hub_key: String,
    pub dashboard_addr: String,
    pub dashboard_key: String,

    /// Syzkaller installation, binaries are looked up in its bin subdir
    pub syzkaller: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    pub count: i64,
    pub devices: Vec<String>,
    pub procs: i64,
    pub sandbox: String,

    pub machine_type: String,

    pub odroid_host_addr: String,
    pub odroid_slave_addr: String,
    pub odroid_console: String,
    pub odroid_hub_bus: i32,
    pub odroid_hub_device: i32,
    pub odroid_hub_port: i32,

    pub cover: bool,
    pub leak: bool,
    pub reproduce: bool,

    pub enable_syscalls: Vec<String>,
    pub disable_syscalls: Vec<String>,
    pub suppressions: Vec<String>,
    pub ignores: Vec<String>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            http: String::new(),
            rpc: String::new(),
            workdir: String::new(),
            vmlinux: String::new(),
            kernel: String::new(),
            tag: String::new(),
            cmdline: String::new(),
            image: String::new(),
            initrd: String::new(),
            cpu: 0,
            mem: 0,
            sshkey: String::new(),
            bin: String::new(),
            bin_args: String::new(),
            debug: false,
            output: String::new(),
            hub_addr: String::new(),
            hub_key: String::new(),
            dashboard_addr: String::new(),
            dashboard_key: String::new(),
            syzkaller: String::new(),
            instance_type: String::new(),
            count: 0,
            devices: Vec::new(),
            procs: 0,
            sandbox: "setuid".to_string(),
            machine_type: String::new(),
            odroid_host_addr: String::new(),
            odroid_slave_addr: String::new(),
            odroid_console: String::new(),
            odroid_hub_bus: 0,
            odroid_hub_device: 0,
            odroid_hub_port: 0,
            cover: true,
            leak: false,
            reproduce: true,
            enable_syscalls: Vec::new(),
            disable_syscalls: Vec::new(),
            suppressions: Vec::new(),
            ignores: Vec::new(),
        }
    }
}

impl RawConfig {
    /// Read and deserialize a config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let parsed = if is_toml {
            Self::from_toml(&content)
        } else {
            Self::from_json(&content)
        };
        parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
