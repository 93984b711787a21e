//! Syscall enable/disable resolution against synthetic and built-in catalogs

use fuzzfleet::error::SyscallList;
use fuzzfleet::filter::{force_enable, MANDATORY_SYSCALL};
use fuzzfleet::{ConfigError, SyscallCatalog, SyscallFilter, SyscallSet};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// mmap=0, open=1, openat=2, close=3
fn small_catalog() -> SyscallCatalog {
    SyscallCatalog::from_names(["mmap", "open", "openat", "close"]).unwrap()
}

#[test]
fn test_prefix_enable_plus_mmap() {
    let catalog = small_catalog();
    let enable = strings(&["open*"]);
    let set = SyscallFilter::new(&enable, &[]).resolve(&catalog).unwrap();
    let expected: SyscallSet = [0, 1, 2].into_iter().collect();
    assert_eq!(set, expected);
}

#[test]
fn test_unknown_enable_pattern() {
    let catalog = small_catalog();
    let enable = strings(&["bogus"]);
    let err = SyscallFilter::new(&enable, &[])
        .resolve(&catalog)
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnknownSyscall {
            list: SyscallList::Enabled,
            ..
        }
    ));
    assert_eq!(err.to_string(), "unknown enabled syscall: bogus");
}

#[test]
fn test_empty_enable_is_full_catalog_and_repeatable() {
    let catalog = small_catalog();
    let disable = strings(&["close"]);
    let filter = SyscallFilter::new(&[], &disable);
    let first = filter.resolve(&catalog).unwrap();
    let second = filter.resolve(&catalog).unwrap();
    assert_eq!(first, second);
    let expected: SyscallSet = [0, 1, 2].into_iter().collect();
    assert_eq!(first, expected);
}

#[test]
fn test_disable_typo_is_an_error_even_if_not_enabled() {
    let catalog = small_catalog();
    let enable = strings(&["close"]);
    let disable = strings(&["opne"]);
    let err = SyscallFilter::new(&enable, &disable)
        .resolve(&catalog)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown disabled syscall: opne");
}

#[test]
fn test_exhaustive_disable_keeps_mmap() {
    let catalog = small_catalog();
    let disable = strings(&["mmap", "open*", "close"]);
    let set = SyscallFilter::new(&[], &disable).resolve(&catalog).unwrap();
    assert_eq!(set.len(), 1);
    assert!(set.contains(catalog.by_name(MANDATORY_SYSCALL).unwrap().id));
}

#[test]
fn test_force_enable_is_separate_step() {
    let catalog = small_catalog();
    let mut set = SyscallSet::default();
    force_enable(&mut set, &catalog).unwrap();
    let names: Vec<&str> = set.names(&catalog).collect();
    assert_eq!(names, vec!["mmap"]);
}

#[test]
fn test_variants_by_call_name() {
    let catalog = SyscallCatalog::new(vec![
        ("mmap", "mmap", Some(9)),
        ("ioctl", "ioctl", Some(16)),
        ("ioctl$TIOCSTI", "ioctl", Some(16)),
        ("ioctl$KVM_RUN", "ioctl", Some(16)),
        ("socket$inet", "socket", Some(41)),
    ])
    .unwrap();

    let enable = strings(&["ioctl"]);
    let set = SyscallFilter::new(&enable, &[]).resolve(&catalog).unwrap();
    assert_eq!(set.len(), 4);

    let enable = strings(&["ioctl$KVM*", "socket"]);
    let set = SyscallFilter::new(&enable, &[]).resolve(&catalog).unwrap();
    let names: Vec<&str> = set.names(&catalog).collect();
    assert_eq!(names, vec!["mmap", "ioctl$KVM_RUN", "socket$inet"]);

    let disable = strings(&["ioctl$TIOCSTI"]);
    let set = SyscallFilter::new(&[], &disable).resolve(&catalog).unwrap();
    assert!(!set.contains(2));
    assert_eq!(set.len(), 4);
}

#[test]
fn test_builtin_catalog_resolution() {
    let catalog = SyscallCatalog::x86_64();
    let enable = strings(&["read", "write", "get*"]);
    let disable = strings(&["getrandom"]);
    let set = SyscallFilter::new(&enable, &disable)
        .resolve(&catalog)
        .unwrap();
    let names: Vec<&str> = set.names(&catalog).collect();
    assert!(names.contains(&"read"));
    assert!(names.contains(&"getpid"));
    assert!(names.contains(&"mmap"));
    assert!(!names.contains(&"getrandom"));
    assert!(!names.contains(&"close"));
}
