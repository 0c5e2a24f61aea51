//! Fuzz target for ORCID iD validation.
//!
//! Accepted input must come back unchanged, and never panic on anything else.

#![no_main]

use libfuzzer_sys::fuzz_target;
use nanokey_core::orcid;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        match orcid::validate(Some(s)) {
            Ok(Some(id)) => assert_eq!(id.as_str(), s),
            Ok(None) => assert!(s.is_empty()),
            Err(_) => {}
        }
    }

    let lossy = String::from_utf8_lossy(data);
    let _ = orcid::validate(Some(&lossy));
});
