//! Structured records parsed out of tabular dataset files.
//!
//! A [`Record`] is one CSV row keyed by header name. A [`ParsedResult`]
//! holds either the rows of the only CSV file in a dataset or, when there
//! are several, the rows of each file keyed by file stem.
//!
//! # Serialized form
//!
//! `ParsedResult` serializes untagged: a single file becomes a JSON array
//! of objects and several files become an object of such arrays. This is
//! the layout of the on-disk cache files, so existing caches stay readable.

pub mod io_csv;
pub mod io_json;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of a CSV file. Missing cells are `None`, never `""`.
pub type Record = BTreeMap<String, Option<String>>;

/// Parsed content of a dataset's CSV files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedResult {
    /// Exactly one CSV file was found.
    SingleFile(Vec<Record>),
    /// Several CSV files, keyed by file name without extension.
    MultiFile(BTreeMap<String, Vec<Record>>),
}

impl ParsedResult {
    /// Collapse per-file records into the single- or multi-file shape.
    /// Returns `None` when there are no files at all.
    pub fn from_files(mut files: BTreeMap<String, Vec<Record>>) -> Option<Self> {
        match files.len() {
            0 => None,
            1 => files.pop_first().map(|(_, records)| Self::SingleFile(records)),
            _ => Some(Self::MultiFile(files)),
        }
    }

    pub fn file_count(&self) -> usize {
        match self {
            Self::SingleFile(_) => 1,
            Self::MultiFile(files) => files.len(),
        }
    }

    /// Total number of records across all files.
    pub fn record_count(&self) -> usize {
        match self {
            Self::SingleFile(records) => records.len(),
            Self::MultiFile(files) => files.values().map(Vec::len).sum(),
        }
    }

    pub fn as_single(&self) -> Option<&[Record]> {
        match self {
            Self::SingleFile(records) => Some(records),
            Self::MultiFile(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&BTreeMap<String, Vec<Record>>> {
        match self {
            Self::SingleFile(_) => None,
            Self::MultiFile(files) => Some(files),
        }
    }
}
