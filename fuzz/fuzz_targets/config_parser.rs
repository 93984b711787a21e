#![no_main]

use fuzzfleet::config::{Config, RawConfig};
use fuzzfleet::SyscallCatalog;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    // Loading and validating arbitrary input must never panic
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(raw) = RawConfig::from_json(input) {
            let catalog = SyscallCatalog::x86_64();
            let _ = Config::from_raw(raw, &catalog, Path::new("/tmp"));
        }
    }
});
