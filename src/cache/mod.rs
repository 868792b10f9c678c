//! Local answers to dataset requests, consulted before any network access.
//!
//! Two kinds of state live on disk: parsed-result files under the cache
//! root (`<owner>_<name>_parsed.json`) and extraction directories under the
//! download root (`<owner>_<name>/`). Neither is ever evicted.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::api::DatasetRef;
use crate::error::KaggleError;
use crate::records::io_json::{read_parsed_json, write_parsed_json};
use crate::records::ParsedResult;

/// Flags controlling a single dataset request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DownloadOptions {
    /// Consult and populate local state.
    pub use_cache: bool,
    /// Parse contained CSV files into records.
    pub parse_csv: bool,
    /// In cache-only mode, treat a miss as an error rather than an absence.
    pub force_cache: bool,
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn use_cache(mut self, value: bool) -> Self {
        self.use_cache = value;
        self
    }

    pub fn parse_csv(mut self, value: bool) -> Self {
        self.parse_csv = value;
        self
    }

    pub fn force_cache(mut self, value: bool) -> Self {
        self.force_cache = value;
        self
    }
}

/// What the local state can offer for a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheLookup {
    /// A previously parsed result.
    Parsed(ParsedResult),
    /// A non-empty extraction directory from an earlier download.
    Extracted(PathBuf),
    Miss,
}

/// Parsed-result files under a cache root.
#[derive(Clone, Debug)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn entry_path(&self, dataset: &DatasetRef) -> PathBuf {
        self.root.join(dataset.cache_key())
    }

    pub fn contains(&self, dataset: &DatasetRef) -> bool {
        self.entry_path(dataset).is_file()
    }

    pub fn load(&self, dataset: &DatasetRef) -> Result<ParsedResult, KaggleError> {
        read_parsed_json(&self.entry_path(dataset))
    }

    /// Write `result` for `dataset`, overwriting any existing entry.
    pub fn store(&self, dataset: &DatasetRef, result: &ParsedResult) -> Result<(), KaggleError> {
        let path = self.entry_path(dataset);
        write_parsed_json(&path, result)?;
        debug!(dataset = %dataset, path = %path.display(), "cached parsed result");
        Ok(())
    }

    /// Check local state in priority order: parsed cache first (only when
    /// both `use_cache` and `parse_csv` are set), then the extraction
    /// directory (when `use_cache` is set).
    pub fn lookup(
        &self,
        dataset: &DatasetRef,
        download_root: &Path,
        options: &DownloadOptions,
    ) -> Result<CacheLookup, KaggleError> {
        if !options.use_cache {
            return Ok(CacheLookup::Miss);
        }

        if options.parse_csv && self.contains(dataset) {
            debug!(dataset = %dataset, "parsed cache hit");
            return self.load(dataset).map(CacheLookup::Parsed);
        }

        let extracted = dataset.extraction_dir(download_root);
        if is_non_empty_dir(&extracted)? {
            debug!(dataset = %dataset, path = %extracted.display(), "extraction directory hit");
            return Ok(CacheLookup::Extracted(extracted));
        }

        debug!(dataset = %dataset, "cache miss");
        Ok(CacheLookup::Miss)
    }
}

fn is_non_empty_dir(path: &Path) -> Result<bool, KaggleError> {
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(path)?.next().is_some())
}
