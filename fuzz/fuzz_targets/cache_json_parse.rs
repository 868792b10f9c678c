//! Fuzz target for decoding parsed-result cache files.
//!
//! Run with:
//!   cargo +nightly fuzz run cache_json_parse

#![no_main]

use kaggle_client::records::io_json::{from_json_slice, to_json_string};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    // Anything that decodes must encode again.
    if let Ok(result) = from_json_slice(data) {
        let _ = to_json_string(&result).expect("re-encode cached result");
    }
});
