//! Syscall enable/disable resolution
//!
//! Patterns are matched against catalog entries:
//! - Exact call name: `open` matches `open` and every `open$variant`
//! - Exact unique name: `open$dir`
//! - Prefix wildcard: `open*` matches every name starting with `open`
//!
//! The wildcard is a single trailing `*`, nothing more. A lone `*` matches
//! nothing.

use crate::error::{ConfigError, Result, SyscallList};
use crate::syscalls::{SyscallCatalog, SyscallDesc};
use std::collections::BTreeSet;

/// Syscall that is always enabled, the fuzzer allocates memory through it
pub const MANDATORY_SYSCALL: &str = "mmap";

const WILDCARD: char = '*';

/// Check whether a pattern selects a catalog entry
pub fn matches(call: &SyscallDesc, pattern: &str) -> bool {
    if pattern == call.call_name || pattern == call.name {
        return true;
    }
    match pattern.strip_suffix(WILDCARD) {
        Some(prefix) if !prefix.is_empty() => call.name.starts_with(prefix),
        _ => false,
    }
}

/// Set of syscall ids a fuzzer is permitted to use
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyscallSet {
    ids: BTreeSet<usize>,
}

impl SyscallSet {
    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Ids in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids.iter().copied()
    }

    /// Names of the enabled entries in id order
    pub fn names<'a>(&'a self, catalog: &'a SyscallCatalog) -> impl Iterator<Item = &'a str> {
        self.iter()
            .filter_map(|id| catalog.get(id))
            .map(|c| c.name.as_str())
    }
}

impl FromIterator<usize> for SyscallSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Enable/disable lists that determine which syscalls a fuzzer may use
#[derive(Debug, Clone, Default)]
pub struct SyscallFilter<'a> {
    enable: &'a [String],
    disable: &'a [String],
}

impl<'a> SyscallFilter<'a> {
    pub fn new(enable: &'a [String], disable: &'a [String]) -> Self {
        Self { enable, disable }
    }

    /// Compute the permitted syscall set against a catalog
    ///
    /// An empty enable list starts from the whole catalog. Every enable and
    /// disable pattern must match at least one catalog entry; disable
    /// patterns are checked against the catalog, not the current set.
    /// `mmap` is enabled last regardless of the lists.
    pub fn resolve(&self, catalog: &SyscallCatalog) -> Result<SyscallSet> {
        let mut ids = BTreeSet::new();
        if self.enable.is_empty() {
            ids.extend(catalog.calls().iter().map(|c| c.id));
        } else {
            for pattern in self.enable {
                let before = ids.len();
                let mut matched = false;
                for call in catalog.calls().iter().filter(|c| matches(c, pattern)) {
                    ids.insert(call.id);
                    matched = true;
                }
                if !matched {
                    return Err(unknown(SyscallList::Enabled, pattern));
                }
                tracing::trace!(pattern = %pattern, added = ids.len() - before, "enabled syscalls");
            }
        }

        for pattern in self.disable {
            let mut matched = false;
            for call in catalog.calls().iter().filter(|c| matches(c, pattern)) {
                ids.remove(&call.id);
                matched = true;
            }
            if !matched {
                return Err(unknown(SyscallList::Disabled, pattern));
            }
        }

        let mut set = SyscallSet { ids };
        force_enable(&mut set, catalog)?;
        tracing::debug!(enabled = set.len(), total = catalog.len(), "resolved syscalls");
        Ok(set)
    }
}

/// Re-enable the mandatory syscall after all list processing
pub fn force_enable(set: &mut SyscallSet, catalog: &SyscallCatalog) -> Result<()> {
    let mmap = catalog
        .by_name(MANDATORY_SYSCALL)
        .ok_or(ConfigError::MissingSyscall(MANDATORY_SYSCALL))?;
    set.ids.insert(mmap.id);
    Ok(())
}

fn unknown(list: SyscallList, pattern: &str) -> ConfigError {
    ConfigError::UnknownSyscall {
        list,
        pattern: pattern.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SyscallCatalog {
        SyscallCatalog::new(vec![
            ("open", "open", Some(2)),
            ("openat", "openat", Some(257)),
            ("close", "close", Some(3)),
            ("mmap", "mmap", Some(9)),
            ("open$dir", "open", Some(2)),
        ])
        .unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn desc(name: &str, call_name: &str) -> SyscallDesc {
        SyscallDesc {
            id: 0,
            name: name.to_string(),
            call_name: call_name.to_string(),
            nr: None,
        }
    }

    #[test]
    fn test_match_exact_names() {
        let variant = desc("open$dir", "open");
        assert!(matches(&variant, "open$dir"));
        assert!(matches(&variant, "open"));
        assert!(!matches(&variant, "openat"));
    }

    #[test]
    fn test_match_prefix_wildcard() {
        assert!(matches(&desc("openat", "openat"), "open*"));
        assert!(matches(&desc("open$dir", "open"), "open$*"));
        assert!(!matches(&desc("close", "close"), "open*"));
    }

    #[test]
    fn test_lone_wildcard_matches_nothing() {
        assert!(!matches(&desc("open", "open"), "*"));
    }

    #[test]
    fn test_wildcard_only_at_end() {
        assert!(!matches(&desc("openat", "openat"), "*at"));
        assert!(!matches(&desc("openat", "openat"), "op*at"));
    }

    #[test]
    fn test_enable_prefix() {
        let cat = catalog();
        let enable = strings(&["open*"]);
        let set = SyscallFilter::new(&enable, &[]).resolve(&cat).unwrap();
        let expected: SyscallSet = [0, 1, 3, 4].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_enable_call_name_selects_variants() {
        let cat = catalog();
        let enable = strings(&["open"]);
        let set = SyscallFilter::new(&enable, &[]).resolve(&cat).unwrap();
        assert!(set.contains(0));
        assert!(set.contains(4));
        assert!(!set.contains(1));
    }

    #[test]
    fn test_empty_enable_is_everything() {
        let cat = catalog();
        let set = SyscallFilter::default().resolve(&cat).unwrap();
        assert_eq!(set.len(), cat.len());
    }

    #[test]
    fn test_unknown_enabled() {
        let cat = catalog();
        let enable = strings(&["open", "bogus"]);
        let err = SyscallFilter::new(&enable, &[]).resolve(&cat).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownSyscall { list: SyscallList::Enabled, ref pattern } if pattern == "bogus"
        ));
    }

    #[test]
    fn test_unknown_disabled() {
        let cat = catalog();
        let disable = strings(&["bogus*"]);
        let err = SyscallFilter::new(&[], &disable).resolve(&cat).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownSyscall { list: SyscallList::Disabled, .. }
        ));
    }

    #[test]
    fn test_disable_checked_against_catalog_not_set() {
        let cat = catalog();
        let enable = strings(&["close"]);
        let disable = strings(&["openat"]);
        let set = SyscallFilter::new(&enable, &disable).resolve(&cat).unwrap();
        let expected: SyscallSet = [2, 3].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_mmap_survives_disable() {
        let cat = catalog();
        let disable = strings(&["mmap", "open*", "close"]);
        let set = SyscallFilter::new(&[], &disable).resolve(&cat).unwrap();
        let expected: SyscallSet = [3].into_iter().collect();
        assert_eq!(set, expected);
    }

    #[test]
    fn test_catalog_without_mmap() {
        let cat = SyscallCatalog::from_names(["open", "close"]).unwrap();
        let err = SyscallFilter::default().resolve(&cat).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSyscall("mmap")));
    }

    #[test]
    fn test_names_in_id_order() {
        let cat = catalog();
        let enable = strings(&["close"]);
        let set = SyscallFilter::new(&enable, &[]).resolve(&cat).unwrap();
        let names: Vec<&str> = set.names(&cat).collect();
        assert_eq!(names, vec!["close", "mmap"]);
    }
}
