//! Per-instance launch configuration derived from a validated fleet config

use crate::config::{Config, InstanceType};
use crate::error::{ConfigError, Result};
use crate::workdir;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a VM backend needs to boot one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceConfig {
    /// `<type>-<name>-<index>`, unique within the fleet
    pub name: String,
    pub index: usize,
    pub instance_type: InstanceType,
    pub workdir: PathBuf,
    pub bin: Option<PathBuf>,
    pub bin_args: String,
    pub kernel: Option<PathBuf>,
    pub cmdline: String,
    pub image: String,
    pub initrd: Option<PathBuf>,
    pub sshkey: Option<PathBuf>,
    pub executor: PathBuf,
    pub cpu: u32,
    pub mem: u64,
    pub debug: bool,
    /// Only set for adb
    pub device: Option<String>,

    pub machine_type: String,
    pub odroid_host_addr: String,
    pub odroid_slave_addr: String,
    pub odroid_console: String,
    pub odroid_hub_bus: i32,
    pub odroid_hub_device: i32,
    pub odroid_hub_port: i32,
}

impl Config {
    /// Project the launch config of instance `index`
    ///
    /// Allocates a fresh working directory under the fleet workdir.
    pub fn instance_config(&self, index: usize) -> Result<InstanceConfig> {
        if index >= self.count {
            return Err(ConfigError::InvalidIndex {
                index,
                count: self.count,
            });
        }
        let workdir = workdir::process_temp_dir(&self.workdir)?;
        Ok(InstanceConfig {
            name: format!("{}-{}-{}", self.instance_type, self.name, index),
            index,
            instance_type: self.instance_type,
            workdir,
            bin: self.bin.clone(),
            bin_args: self.bin_args.clone(),
            kernel: self.kernel.clone(),
            cmdline: self.cmdline.clone(),
            image: self.image.clone(),
            initrd: self.initrd.clone(),
            sshkey: self.sshkey.clone(),
            executor: self.executor_path(),
            cpu: self.cpu,
            mem: self.mem,
            debug: self.debug,
            device: self.devices.get(index).cloned(),
            machine_type: self.machine_type.clone(),
            odroid_host_addr: self.odroid.host_addr.clone(),
            odroid_slave_addr: self.odroid.slave_addr.clone(),
            odroid_console: self.odroid.console.clone(),
            odroid_hub_bus: self.odroid.hub_bus,
            odroid_hub_device: self.odroid.hub_device,
            odroid_hub_port: self.odroid.hub_port,
        })
    }

    /// Launch configs for every instance in the fleet
    pub fn instance_configs(&self) -> Result<Vec<InstanceConfig>> {
        (0..self.count).map(|i| self.instance_config(i)).collect()
    }
}
