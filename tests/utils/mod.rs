// Shared fixtures for integration tests
//
// Builds a scratch syzkaller installation and workdir inside a TempDir.

#![allow(dead_code)]

use fuzzfleet::config::RawConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join("syzkaller/bin");
        fs::create_dir_all(&bin).unwrap();
        fs::write(bin.join("syz-fuzzer"), "").unwrap();
        fs::write(bin.join("syz-executor"), "").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn syzkaller(&self) -> PathBuf {
        self.path().join("syzkaller")
    }

    pub fn workdir(&self) -> PathBuf {
        self.path().join("workdir")
    }

    /// A record that validates for the given generic pool type
    pub fn raw(&self, instance_type: &str) -> RawConfig {
        RawConfig {
            name: "ci".to_string(),
            http: "localhost:50000".to_string(),
            workdir: self.workdir().display().to_string(),
            vmlinux: "/boot/vmlinux".to_string(),
            syzkaller: self.syzkaller().display().to_string(),
            instance_type: instance_type.to_string(),
            count: 1,
            ..RawConfig::default()
        }
    }

    /// Write a config file next to the installation
    pub fn write_config(&self, file_name: &str, content: &str) -> PathBuf {
        let path = self.path().join(file_name);
        fs::write(&path, content).unwrap();
        path
    }

    /// JSON config for a qemu fleet of `count` instances
    pub fn qemu_json(&self, count: usize) -> String {
        format!(
            r#"{{
                "name": "ci",
                "http": "localhost:50000",
                "workdir": "{}",
                "vmlinux": "/boot/vmlinux",
                "syzkaller": "{}",
                "type": "qemu",
                "count": {},
                "enable_syscalls": ["open*", "close"],
                "disable_syscalls": ["openat"]
            }}"#,
            self.workdir().display(),
            self.syzkaller().display(),
            count
        )
    }
}
