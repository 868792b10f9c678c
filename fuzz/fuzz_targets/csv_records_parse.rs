//! Fuzz target for CSV record parsing, including the quoting check.
//!
//! Run with:
//!   cargo +nightly fuzz run csv_records_parse

#![no_main]

use kaggle_client::records::io_csv::from_csv_slice;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = from_csv_slice(data);
});
