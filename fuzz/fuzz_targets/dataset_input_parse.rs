//! Fuzz target for dataset reference parsing (`owner/name` or URL).
//!
//! Run with:
//!   cargo +nightly fuzz run dataset_input_parse

#![no_main]

use kaggle_client::api::resolve::parse_dataset_input;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    // Accepted references never produce path separators in local names.
    if let Ok(dataset) = parse_dataset_input(input) {
        assert!(!dataset.cache_key().contains('/'));
        assert!(!dataset.cache_key().contains('\\'));
    }
});
