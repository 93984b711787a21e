//! Per-instance working directories
//!
//! Instances get `instance-N` subdirectories of the shared workdir. Each one
//! holds a `.pid` file with the owning process id so directories left behind
//! by dead processes can be reclaimed. Allocation is serialized across
//! processes with a `flock` on `instance-lock`.

use crate::error::{ConfigError, Result};
use nix::errno::Errno;
use nix::fcntl::{Flock, FlockArg};
use nix::sys::signal::kill;
use nix::unistd::Pid;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Maximum number of live instance directories under one workdir
pub const MAX_INSTANCES: usize = 1000;

const LOCK_FILE: &str = "instance-lock";
const PID_FILE: &str = ".pid";

/// Create a fresh instance directory under `base`
pub fn process_temp_dir(base: &Path) -> Result<PathBuf> {
    let err = |reason: String| ConfigError::InstanceDir {
        path: base.to_path_buf(),
        reason,
    };
    fs::create_dir_all(base).map_err(|e| err(e.to_string()))?;
    let lock = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(base.join(LOCK_FILE))
        .map_err(|e| err(e.to_string()))?;
    let _lock = Flock::lock(lock, FlockArg::LockExclusive)
        .map_err(|(_, errno)| err(format!("failed to lock: {errno}")))?;

    let mut i = 0;
    while i < MAX_INSTANCES {
        let path = base.join(format!("instance-{i}"));
        match fs::create_dir(&path) {
            Ok(()) => {
                fs::write(path.join(PID_FILE), std::process::id().to_string())
                    .map_err(|e| err(e.to_string()))?;
                tracing::debug!(dir = %path.display(), "allocated instance dir");
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if reclaim_stale(&path) {
                    continue;
                }
            }
            Err(e) => return Err(err(e.to_string())),
        }
        i += 1;
    }
    Err(err("too many live instances".to_string()))
}

/// Remove a directory whose owning process is gone, returns true if removed
fn reclaim_stale(path: &Path) -> bool {
    // A missing or unreadable pid file means the owner has not written it yet.
    let Some(pid) = fs::read_to_string(path.join(PID_FILE))
        .ok()
        .and_then(|data| data.trim().parse::<i32>().ok())
    else {
        return false;
    };
    if pid <= 1 || kill(Pid::from_raw(pid), None) != Err(Errno::ESRCH) {
        return false;
    }
    if fs::remove_file(path.join(PID_FILE)).is_err() || fs::remove_dir_all(path).is_err() {
        return false;
    }
    tracing::warn!(dir = %path.display(), pid, "removed stale instance dir");
    true
}
