//! The dataset pipeline.
//!
//! A call to [`KaggleClient::download_dataset`] moves through these states:
//!
//! ```text
//! START -> cache check -> CACHED_RETURN
//!                      -> EXTRACTED_RETURN
//!                      -> CACHE_ONLY_REFUSAL        (cache-only mode, no hit)
//!                      -> FETCH -> SAVE -> EXTRACT -> PARSE? -> CACHE_WRITE? -> RETURN
//! ```
//!
//! Every stage fails fast; nothing is retried.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::api::fetch::{fetch_archive, fetch_json};
use crate::api::resolve::parse_dataset_input;
use crate::api::transport::{Transport, UreqTransport};
use crate::api::DatasetRef;
use crate::archive::{archive_path, extract_zip, remove_archive, save_archive};
use crate::cache::{CacheLookup, CacheStore, DownloadOptions};
use crate::config::{ClientConfig, ClientOptions};
use crate::constants::{FILES_ENDPOINT, VIEW_ENDPOINT};
use crate::error::KaggleError;
use crate::records::io_csv::{parse_csv_file, parse_csv_tree};
use crate::records::{ParsedResult, Record};

/// What a successful dataset request yields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetOutput {
    /// Records parsed from the dataset's CSV files.
    Parsed(ParsedResult),
    /// The extraction directory, when parsing was not requested or found
    /// no CSV files.
    Directory(PathBuf),
}

impl DatasetOutput {
    pub fn as_parsed(&self) -> Option<&ParsedResult> {
        match self {
            Self::Parsed(result) => Some(result),
            Self::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&Path> {
        match self {
            Self::Parsed(_) => None,
            Self::Directory(path) => Some(path),
        }
    }
}

/// Client for the Kaggle dataset API with a local download cache.
#[derive(Debug)]
pub struct KaggleClient<T = UreqTransport> {
    config: ClientConfig,
    cache: CacheStore,
    transport: T,
}

impl KaggleClient<UreqTransport> {
    /// Build a client talking to the real API.
    pub fn new(options: ClientOptions) -> Result<Self, KaggleError> {
        Ok(Self::with_transport(options.build()?, UreqTransport))
    }
}

impl<T: Transport> KaggleClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        let cache = CacheStore::new(config.cache_dir());
        Self {
            config,
            cache,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Download `owner/name`, optionally parsing and caching its CSV files.
    ///
    /// Returns `Ok(None)` only in cache-only mode when nothing is cached and
    /// `force_cache` is not set.
    pub fn download_dataset(
        &self,
        owner: &str,
        name: &str,
        options: &DownloadOptions,
    ) -> Result<Option<DatasetOutput>, KaggleError> {
        let dataset = DatasetRef::new(owner, name)?;
        self.download(&dataset, options)
    }

    /// Like [`KaggleClient::download_dataset`] for an already resolved reference.
    pub fn download(
        &self,
        dataset: &DatasetRef,
        options: &DownloadOptions,
    ) -> Result<Option<DatasetOutput>, KaggleError> {
        let download_root = self.config.download_dir();

        match self.cache.lookup(dataset, download_root, options)? {
            CacheLookup::Parsed(result) => return Ok(Some(DatasetOutput::Parsed(result))),
            CacheLookup::Extracted(dir) => return self.finish_extracted(dir, options).map(Some),
            CacheLookup::Miss => {}
        }

        if self.config.cache_only() {
            if options.force_cache {
                return Err(KaggleError::CacheNotFound {
                    dataset: dataset.path(),
                });
            }
            debug!(dataset = %dataset, "cache-only miss, returning nothing");
            return Ok(None);
        }

        info!(dataset = %dataset, "fetching dataset archive");
        let bytes = fetch_archive(&self.transport, &self.config, dataset)?;

        let output = self.materialize(dataset, &bytes, options)?;

        if options.use_cache && options.parse_csv {
            if let DatasetOutput::Parsed(result) = &output {
                self.cache.store(dataset, result)?;
            }
        }

        Ok(Some(output))
    }

    /// Describe the files of `owner/name` as reported by the API.
    pub fn list_dataset_files(&self, owner: &str, name: &str) -> Result<Value, KaggleError> {
        let dataset = DatasetRef::new(owner, name)?;
        fetch_json(&self.transport, &self.config, FILES_ENDPOINT, &dataset)
    }

    /// Metadata of `owner/name` as reported by the API.
    pub fn dataset_metadata(&self, owner: &str, name: &str) -> Result<Value, KaggleError> {
        let dataset = DatasetRef::new(owner, name)?;
        fetch_json(&self.transport, &self.config, VIEW_ENDPOINT, &dataset)
    }

    /// Parse a single local CSV file into records.
    pub fn parse_csv_file(&self, path: &Path) -> Result<Vec<Record>, KaggleError> {
        parse_csv_file(path)
    }

    /// Resolve `owner/name` or a dataset URL.
    pub fn resolve(&self, input: &str) -> Result<DatasetRef, KaggleError> {
        parse_dataset_input(input)
    }

    fn materialize(
        &self,
        dataset: &DatasetRef,
        bytes: &[u8],
        options: &DownloadOptions,
    ) -> Result<DatasetOutput, KaggleError> {
        let download_root = self.config.download_dir();
        let archive = archive_path(download_root, dataset);
        let extracted = dataset.extraction_dir(download_root);

        save_archive(&archive, bytes)?;
        let extraction = extract_zip(&archive, &extracted);
        remove_archive(&archive);
        extraction?;

        self.finish_extracted(extracted, options)
    }

    fn finish_extracted(
        &self,
        dir: PathBuf,
        options: &DownloadOptions,
    ) -> Result<DatasetOutput, KaggleError> {
        if options.parse_csv {
            if let Some(result) = parse_csv_tree(&dir)? {
                return Ok(DatasetOutput::Parsed(result));
            }
            debug!(path = %dir.display(), "no csv files found, returning directory");
        }
        Ok(DatasetOutput::Directory(dir))
    }
}
