//! Syscall catalog consulted by the enable/disable resolver
//!
//! A catalog is an ordered, read-only table of syscall descriptors. Each
//! descriptor has a unique `name` (which may carry a `$variant` suffix,
//! e.g. `open$dir`), the kernel `call_name` it invokes, and an `id` equal
//! to its position in the table.

use crate::error::{ConfigError, Result};
use std::collections::HashMap;

/// x86_64 syscall numbers and names for the built-in catalog
const X86_64_SYSCALLS: &[(u32, &str)] = &[
    (0, "read"),
    (1, "write"),
    (2, "open"),
    (3, "close"),
    (4, "stat"),
    (5, "fstat"),
    (6, "lstat"),
    (7, "poll"),
    (8, "lseek"),
    (9, "mmap"),
    (10, "mprotect"),
    (11, "munmap"),
    (12, "brk"),
    (13, "rt_sigaction"),
    (14, "rt_sigprocmask"),
    (15, "rt_sigreturn"),
    (16, "ioctl"),
    (17, "pread64"),
    (18, "pwrite64"),
    (19, "readv"),
    (20, "writev"),
    (21, "access"),
    (22, "pipe"),
    (23, "select"),
    (24, "sched_yield"),
    (25, "mremap"),
    (26, "msync"),
    (27, "mincore"),
    (28, "madvise"),
    (29, "shmget"),
    (30, "shmat"),
    (31, "shmctl"),
    (32, "dup"),
    (33, "dup2"),
    (34, "pause"),
    (35, "nanosleep"),
    (36, "getitimer"),
    (37, "alarm"),
    (38, "setitimer"),
    (39, "getpid"),
    (40, "sendfile"),
    (41, "socket"),
    (42, "connect"),
    (43, "accept"),
    (44, "sendto"),
    (45, "recvfrom"),
    (46, "sendmsg"),
    (47, "recvmsg"),
    (48, "shutdown"),
    (49, "bind"),
    (50, "listen"),
    (51, "getsockname"),
    (52, "getpeername"),
    (53, "socketpair"),
    (54, "setsockopt"),
    (55, "getsockopt"),
    (56, "clone"),
    (57, "fork"),
    (58, "vfork"),
    (59, "execve"),
    (60, "exit"),
    (61, "wait4"),
    (62, "kill"),
    (63, "uname"),
    (72, "fcntl"),
    (73, "flock"),
    (74, "fsync"),
    (75, "fdatasync"),
    (76, "truncate"),
    (77, "ftruncate"),
    (78, "getdents"),
    (79, "getcwd"),
    (80, "chdir"),
    (81, "fchdir"),
    (82, "rename"),
    (83, "mkdir"),
    (84, "rmdir"),
    (85, "creat"),
    (86, "link"),
    (87, "unlink"),
    (88, "symlink"),
    (89, "readlink"),
    (90, "chmod"),
    (91, "fchmod"),
    (92, "chown"),
    (93, "fchown"),
    (94, "lchown"),
    (95, "umask"),
    (96, "gettimeofday"),
    (97, "getrlimit"),
    (98, "getrusage"),
    (99, "sysinfo"),
    (102, "getuid"),
    (104, "getgid"),
    (105, "setuid"),
    (107, "setgid"),
    (108, "geteuid"),
    (109, "getegid"),
    (110, "setpgid"),
    (111, "getppid"),
    (112, "getpgrp"),
    (113, "setsid"),
    (131, "sigaltstack"),
    (157, "prctl"),
    (158, "arch_prctl"),
    (186, "gettid"),
    (202, "futex"),
    (217, "getdents64"),
    (218, "set_tid_address"),
    (228, "clock_gettime"),
    (231, "exit_group"),
    (257, "openat"),
    (262, "newfstatat"),
    (273, "set_robust_list"),
    (318, "getrandom"),
    (332, "statx"),
];

/// One entry of the syscall catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyscallDesc {
    /// Position in the catalog
    pub id: usize,
    /// Unique name, e.g. "open$dir"
    pub name: String,
    /// Kernel syscall this entry invokes, e.g. "open"
    pub call_name: String,
    /// Kernel syscall number, if known
    pub nr: Option<u32>,
}

/// Ordered, read-only collection of syscall descriptors
#[derive(Debug, Clone)]
pub struct SyscallCatalog {
    calls: Vec<SyscallDesc>,
    by_name: HashMap<String, usize>,
}

impl SyscallCatalog {
    /// Build a catalog from `(name, call_name, nr)` triples
    ///
    /// Ids are assigned in order. Duplicate names are rejected.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, Option<u32>)>,
        S: Into<String>,
    {
        let mut calls = Vec::new();
        let mut by_name = HashMap::new();
        for (name, call_name, nr) in entries {
            let id = calls.len();
            let name = name.into();
            if by_name.insert(name.clone(), id).is_some() {
                return Err(ConfigError::InvalidValue {
                    field: "catalog",
                    value: name,
                    allowed: "unique syscall names",
                });
            }
            calls.push(SyscallDesc {
                id,
                name,
                call_name: call_name.into(),
                nr,
            });
        }
        Ok(Self { calls, by_name })
    }

    /// Build a catalog of plain syscalls where every name is its own call name
    pub fn from_names<'a, I>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self::new(names.into_iter().map(|n| (n, n, None)))
    }

    /// Built-in catalog of Linux x86_64 syscalls
    pub fn x86_64() -> Self {
        let calls = X86_64_SYSCALLS
            .iter()
            .enumerate()
            .map(|(id, &(nr, name))| SyscallDesc {
                id,
                name: name.to_string(),
                call_name: name.to_string(),
                nr: Some(nr),
            })
            .collect::<Vec<_>>();
        let by_name = calls.iter().map(|c| (c.name.clone(), c.id)).collect();
        Self { calls, by_name }
    }

    /// All descriptors in catalog order
    pub fn calls(&self) -> &[SyscallDesc] {
        &self.calls
    }

    /// Look up a descriptor by its unique name
    pub fn by_name(&self, name: &str) -> Option<&SyscallDesc> {
        self.by_name.get(name).map(|&id| &self.calls[id])
    }

    /// Look up a descriptor by id
    pub fn get(&self, id: usize) -> Option<&SyscallDesc> {
        self.calls.get(id)
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
