//! Enumerated config values and per-type validation rules

use super::raw::RawConfig;
use crate::error::{ConfigError, Result};
use serde::Serialize;
use std::fmt;

/// Upper bound on the size of a generic VM pool
pub const MAX_VM_COUNT: i64 = 1000;

/// Deployment target of the fleet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    /// Fuzzer started externally, only the RPC endpoint is served
    None,
    /// Android devices reached over adb
    Adb,
    /// A single Odroid board behind a switchable USB hub
    Odroid,
    /// Google Compute Engine VMs
    Gce,
    Qemu,
    Kvm,
    /// Fuzzer processes on the local machine
    Local,
}

impl InstanceType {
    pub const ALLOWED: &'static str = "none/adb/odroid/gce/qemu/kvm/local";

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(InstanceType::None),
            "adb" => Ok(InstanceType::Adb),
            "odroid" => Ok(InstanceType::Odroid),
            "gce" => Ok(InstanceType::Gce),
            "qemu" => Ok(InstanceType::Qemu),
            "kvm" => Ok(InstanceType::Kvm),
            "local" => Ok(InstanceType::Local),
            _ => Err(ConfigError::InvalidValue {
                field: "type",
                value: value.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceType::None => "none",
            InstanceType::Adb => "adb",
            InstanceType::Odroid => "odroid",
            InstanceType::Gce => "gce",
            InstanceType::Qemu => "qemu",
            InstanceType::Kvm => "kvm",
            InstanceType::Local => "local",
        }
    }

    /// Output mode used when the config leaves it empty
    pub fn default_output(&self) -> OutputMode {
        match self {
            InstanceType::Local => OutputMode::None,
            _ => OutputMode::Stdout,
        }
    }

    /// Check the type-specific params and return the instance count
    pub(crate) fn check(&self, raw: &RawConfig) -> Result<usize> {
        match self {
            InstanceType::None => self.check_none(raw),
            InstanceType::Adb => self.check_adb(raw),
            InstanceType::Odroid => self.check_odroid(raw),
            InstanceType::Gce => {
                if raw.machine_type.is_empty() {
                    return Err(ConfigError::missing("machine_type", "required for type \"gce\""));
                }
                self.check_pool(raw)
            }
            InstanceType::Qemu | InstanceType::Kvm | InstanceType::Local => self.check_pool(raw),
        }
    }

    fn check_none(&self, raw: &RawConfig) -> Result<usize> {
        if raw.count != 0 {
            return Err(self.unsupported("count", "instances are started externally"));
        }
        if raw.rpc.is_empty() {
            return Err(ConfigError::missing("rpc", "required for type \"none\""));
        }
        if !raw.devices.is_empty() {
            return Err(self.unsupported("devices", "devices are only used by adb"));
        }
        Ok(0)
    }

    fn check_adb(&self, raw: &RawConfig) -> Result<usize> {
        if raw.count != 0 {
            return Err(self.unsupported("count", "specify devices instead"));
        }
        if raw.devices.is_empty() {
            return Err(ConfigError::missing("devices", "specify at least 1 adb device"));
        }
        Ok(raw.devices.len())
    }

    fn check_odroid(&self, raw: &RawConfig) -> Result<usize> {
        if raw.count != 1 {
            return Err(ConfigError::OutOfRange {
                field: "count",
                value: raw.count,
                range: "1, no support for multiple Odroid devices yet",
            });
        }
        let strings = [
            ("odroid_host_addr", &raw.odroid_host_addr),
            ("odroid_slave_addr", &raw.odroid_slave_addr),
            ("odroid_console", &raw.odroid_console),
        ];
        for (field, value) in strings {
            if value.is_empty() {
                return Err(ConfigError::missing(field, "required for type \"odroid\""));
            }
        }
        let numbers = [
            ("odroid_hub_bus", raw.odroid_hub_bus),
            ("odroid_hub_device", raw.odroid_hub_device),
            ("odroid_hub_port", raw.odroid_hub_port),
        ];
        for (field, value) in numbers {
            if value == 0 {
                return Err(ConfigError::missing(field, "required for type \"odroid\""));
            }
        }
        if !raw.devices.is_empty() {
            return Err(self.unsupported("devices", "devices are only used by adb"));
        }
        Ok(1)
    }

    fn check_pool(&self, raw: &RawConfig) -> Result<usize> {
        if raw.count <= 0 || raw.count > MAX_VM_COUNT {
            return Err(ConfigError::OutOfRange {
                field: "count",
                value: raw.count,
                range: "(0, 1000]",
            });
        }
        if !raw.devices.is_empty() {
            return Err(self.unsupported("devices", "devices are only used by adb"));
        }
        Ok(raw.count as usize)
    }

    fn unsupported(&self, field: &'static str, hint: &'static str) -> ConfigError {
        ConfigError::UnsupportedParam {
            field,
            instance_type: self.as_str().to_string(),
            hint,
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where VM console output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    None,
    Stdout,
    Dmesg,
    File,
}

impl OutputMode {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(OutputMode::None),
            "stdout" => Ok(OutputMode::Stdout),
            "dmesg" => Ok(OutputMode::Dmesg),
            "file" => Ok(OutputMode::File),
            _ => Err(ConfigError::InvalidValue {
                field: "output",
                value: value.to_string(),
                allowed: "none/stdout/dmesg/file",
            }),
        }
    }
}

/// Sandboxing applied to fuzzer processes inside an instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sandbox {
    /// Nothing special, has false positives (e.g. killing init)
    None,
    /// Impersonate user nobody (65534)
    #[default]
    Setuid,
    /// New user/pid/net/mount namespaces, needs kernel namespace support
    Namespace,
}

impl Sandbox {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "none" => Ok(Sandbox::None),
            "setuid" => Ok(Sandbox::Setuid),
            "namespace" => Ok(Sandbox::Namespace),
            _ => Err(ConfigError::InvalidValue {
                field: "sandbox",
                value: value.to_string(),
                allowed: "none/setuid/namespace",
            }),
        }
    }
}
