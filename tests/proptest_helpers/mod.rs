#![allow(dead_code)]

use std::collections::BTreeSet;

use kaggle_client::{DatasetRef, Record};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// A valid owner or dataset-name segment.
pub fn arb_segment() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9.-]{0,11}"
}

pub fn arb_dataset_ref() -> impl Strategy<Value = DatasetRef> {
    (arb_segment(), arb_segment())
        .prop_map(|(owner, name)| DatasetRef::new(&owner, &name).expect("valid segments"))
}

/// A table of 2..5 distinct columns and up to 8 rows, cells possibly
/// empty or containing delimiters, quotes and line breaks.
pub fn arb_table() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    prop::collection::btree_set("[a-z][a-z0-9_]{0,6}", 2..5).prop_flat_map(
        |columns: BTreeSet<String>| {
            let columns: Vec<String> = columns.into_iter().collect();
            let width = columns.len();
            let row = prop::collection::vec("[a-zA-Z0-9 ,\"\n]{0,8}", width);
            (Just(columns), prop::collection::vec(row, 0..8))
        },
    )
}

/// Render a table the way a well-behaved CSV writer would.
pub fn write_csv(columns: &[String], rows: &[Vec<String>]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns).expect("write header");
    for row in rows {
        writer.write_record(row).expect("write row");
    }
    String::from_utf8(writer.into_inner().expect("flush csv")).expect("utf-8")
}

/// The records a table should parse into.
pub fn expected_records(columns: &[String], rows: &[Vec<String>]) -> Vec<Record> {
    rows.iter()
        .map(|row| {
            columns
                .iter()
                .zip(row)
                .map(|(column, cell)| {
                    let value = (!cell.is_empty()).then(|| cell.clone());
                    (column.clone(), value)
                })
                .collect()
        })
        .collect()
}
