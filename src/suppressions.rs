//! Crash report suppression and ignore patterns
//!
//! Suppressed reports are not saved but still restart the instance. Ignored
//! reports are dropped entirely.

use crate::error::{ConfigError, PatternList, Result};
use regex::Regex;

/// Failure signatures caused by resource exhaustion on the host or in the VM,
/// always appended after user suppressions
pub const BUILTIN_SUPPRESSIONS: &[&str] = &[
    "panic: failed to start executor binary",
    "panic: executor failed: pthread_create failed",
    "panic: failed to create temp dir",
    "fatal error: runtime: out of memory",
    "fatal error: runtime: cannot allocate memory",
    // Presumably OOM turned into SIGBUS.
    "fatal error: unexpected signal during runtime execution",
    "signal SIGBUS: bus error",
    "Out of memory: Kill process .* \\(syz-fuzzer\\)",
    "lowmemorykiller: Killing 'syz-fuzzer'",
];

/// Compile user suppressions followed by the built-in ones
pub fn compile_suppressions(patterns: &[String]) -> Result<Vec<Regex>> {
    let builtin = BUILTIN_SUPPRESSIONS.iter().copied();
    let compiled = compile(
        PatternList::Suppression,
        patterns.iter().map(String::as_str).chain(builtin),
    )?;
    tracing::debug!(
        user = patterns.len(),
        total = compiled.len(),
        "compiled suppressions"
    );
    Ok(compiled)
}

/// Compile ignore patterns, there are no built-ins
pub fn compile_ignores(patterns: &[String]) -> Result<Vec<Regex>> {
    compile(PatternList::Ignore, patterns.iter().map(String::as_str))
}

fn compile<'a>(list: PatternList, patterns: impl Iterator<Item = &'a str>) -> Result<Vec<Regex>> {
    patterns
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::BadPattern {
                list,
                pattern: pattern.to_string(),
                source,
            })
        })
        .collect()
}

/// Check whether any pattern matches a report
pub fn matches_any(patterns: &[Regex], report: &str) -> bool {
    patterns.iter().any(|re| re.is_match(report))
}
