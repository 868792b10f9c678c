use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`KaggleError`].
///
/// Callers that only care about "what went wrong" rather than the exact
/// variant can branch on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid credentials, or an unreadable credentials file.
    Authentication,
    /// The remote API reported the dataset as missing or inaccessible.
    DatasetNotFound,
    /// The archive could not be fetched or extracted.
    Download,
    /// Malformed JSON, CSV or cached content.
    Parse,
    /// A forced cache lookup had nothing to return.
    CacheNotFound,
    /// Transport failures, input validation and local I/O.
    Generic,
}

/// The main error type for kaggle-client operations.
#[derive(Debug, Error)]
pub enum KaggleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{message}")]
    Authentication { message: String },

    #[error("Invalid credentials file {path}: {message}")]
    CredentialsFile { path: PathBuf, message: String },

    #[error("Dataset not found or accessible: {dataset}")]
    DatasetNotFound { dataset: String, status: u16 },

    #[error("Failed to download dataset {dataset}: {message}")]
    Download {
        dataset: String,
        status: u16,
        message: String,
    },

    #[error("Failed to extract zip file {path}: {source}")]
    ArchiveExtract {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to extract entry '{entry}' from {path}: {message}")]
    ArchiveEntry {
        path: PathBuf,
        entry: String,
        message: String,
    },

    #[error("Failed to parse CSV file {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    #[error("Failed to parse response for {dataset}: {source}")]
    ResponseParse {
        dataset: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse cached data {path}: {source}")]
    CacheParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write cached data {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Dataset '{dataset}' not found in cache and force_cache is enabled")]
    CacheNotFound { dataset: String },

    #[error("Request timed out: {url}")]
    RequestTimeout { url: String },

    #[error("Request failed: {message}")]
    Request { url: String, message: String },

    #[error("Cannot request {url}: network access is disabled in cache-only mode")]
    NetworkDisabled { url: String },

    #[error("Invalid dataset reference '{input}': {message}")]
    InvalidDataset { input: String, message: String },

    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File is not a CSV: {}", .0.display())]
    NotCsv(PathBuf),
}

impl KaggleError {
    /// Map this error onto the public error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            KaggleError::Authentication { .. } | KaggleError::CredentialsFile { .. } => {
                ErrorKind::Authentication
            }
            KaggleError::DatasetNotFound { .. } => ErrorKind::DatasetNotFound,
            KaggleError::Download { .. }
            | KaggleError::ArchiveExtract { .. }
            | KaggleError::ArchiveEntry { .. } => ErrorKind::Download,
            KaggleError::CsvParse { .. }
            | KaggleError::ResponseParse { .. }
            | KaggleError::CacheParse { .. } => ErrorKind::Parse,
            KaggleError::CacheNotFound { .. } => ErrorKind::CacheNotFound,
            KaggleError::Io(_)
            | KaggleError::CacheWrite { .. }
            | KaggleError::RequestTimeout { .. }
            | KaggleError::Request { .. }
            | KaggleError::NetworkDisabled { .. }
            | KaggleError::InvalidDataset { .. }
            | KaggleError::FileNotFound(_)
            | KaggleError::NotCsv(_) => ErrorKind::Generic,
        }
    }

    /// True for failures below the HTTP layer (timeouts, refused
    /// connections). A non-success status is never a transport error.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            KaggleError::RequestTimeout { .. } | KaggleError::Request { .. }
        )
    }
}
