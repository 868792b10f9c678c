//! Fixed values of the Kaggle public API and of the local on-disk layout.

/// Versioned root of the Kaggle public API.
pub const BASE_URL: &str = "https://www.kaggle.com/api/v1";

/// Path templates under [`BASE_URL`]. The dataset path (`owner/name`) is
/// appended as two further segments.
pub const DOWNLOAD_ENDPOINT: &str = "datasets/download";
pub const FILES_ENDPOINT: &str = "datasets/data";
pub const VIEW_ENDPOINT: &str = "datasets/view";

pub const USER_AGENT: &str = concat!("Kaggle Rust Client/", env!("CARGO_PKG_VERSION"));
pub const ACCEPT: &str = "application/json";

pub const DEFAULT_DOWNLOAD_DIR: &str = "./downloads";
pub const DEFAULT_CACHE_DIR: &str = "./cache";
pub const DEFAULT_CREDENTIALS_FILE: &str = "./kaggle.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const USERNAME_ENV: &str = "KAGGLE_USERNAME";
pub const KEY_ENV: &str = "KAGGLE_KEY";

/// Suffix appended to the flattened dataset path to form a cache file name.
pub const CACHE_SUFFIX: &str = "_parsed.json";

/// Formats the client knows how to turn into structured data.
pub const SUPPORTED_FORMATS: [&str; 2] = ["csv", "json"];
