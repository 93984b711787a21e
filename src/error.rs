//! Error types for configuration validation and derivation

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which syscall list a pattern came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyscallList {
    Enabled,
    Disabled,
}

impl fmt::Display for SyscallList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyscallList::Enabled => write!(f, "enabled"),
            SyscallList::Disabled => write!(f, "disabled"),
        }
    }
}

/// Which report pattern list a regular expression came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternList {
    Suppression,
    Ignore,
}

impl fmt::Display for PatternList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternList::Suppression => write!(f, "suppression"),
            PatternList::Ignore => write!(f, "ignore"),
        }
    }
}

/// Errors that can occur while loading, validating or projecting a config
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("config param {field} is empty ({requirement})")]
    MissingField {
        field: &'static str,
        requirement: String,
    },

    #[error("config param {field} has invalid value {value:?}, must be one of {allowed}")]
    InvalidValue {
        field: &'static str,
        value: String,
        allowed: &'static str,
    },

    #[error("invalid config param {field}: {value}, want {range}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        range: &'static str,
    },

    #[error("type {instance_type} does not support param {field}: {hint}")]
    UnsupportedParam {
        field: &'static str,
        instance_type: String,
        hint: &'static str,
    },

    #[error("unknown {list} syscall: {pattern}")]
    UnknownSyscall { list: SyscallList, pattern: String },

    #[error("failed to compile {list} '{pattern}': {source}")]
    BadPattern {
        list: PatternList,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("bad config syzkaller param: can't find {}", .path.display())]
    MissingBinary { path: PathBuf },

    #[error("syscall catalog has no {0} entry")]
    MissingSyscall(&'static str),

    #[error("invalid VM index {index} (count {count})")]
    InvalidIndex { index: usize, count: usize },

    #[error("failed to get wd: {0}")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to create instance temp dir in {}: {reason}", .path.display())]
    InstanceDir { path: PathBuf, reason: String },
}

impl ConfigError {
    pub(crate) fn missing(field: &'static str, requirement: impl Into<String>) -> Self {
        ConfigError::MissingField {
            field,
            requirement: requirement.into(),
        }
    }

    /// Name of the config param the error is about, if it is tied to one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingField { field, .. }
            | ConfigError::InvalidValue { field, .. }
            | ConfigError::OutOfRange { field, .. }
            | ConfigError::UnsupportedParam { field, .. } => Some(field),
            ConfigError::UnknownSyscall { list, .. } => Some(match list {
                SyscallList::Enabled => "enable_syscalls",
                SyscallList::Disabled => "disable_syscalls",
            }),
            ConfigError::BadPattern { list, .. } => Some(match list {
                PatternList::Suppression => "suppressions",
                PatternList::Ignore => "ignores",
            }),
            ConfigError::MissingBinary { .. } => Some("syzkaller"),
            _ => None,
        }
    }
}

pub type Result<T, E = ConfigError> = std::result::Result<T, E>;
