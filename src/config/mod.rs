//! Client construction options and the resolved, immutable configuration.

pub mod credentials;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::constants::{
    DEFAULT_CACHE_DIR, DEFAULT_CREDENTIALS_FILE, DEFAULT_DOWNLOAD_DIR, DEFAULT_TIMEOUT_SECS,
};
use crate::error::KaggleError;

pub use credentials::{resolve_credentials, Credentials};

/// Options recognised when constructing a client. Unset fields take the
/// documented defaults.
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    username: Option<String>,
    api_key: Option<String>,
    credentials_file: Option<PathBuf>,
    default_credentials_file: Option<PathBuf>,
    download_dir: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    timeout_secs: Option<u64>,
    cache_only: bool,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read credentials from this JSON file (`{"username": .., "key": ..}`).
    pub fn credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = Some(path.into());
        self
    }

    /// Location of the conventional credentials file (`./kaggle.json`).
    pub fn default_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_credentials_file = Some(path.into());
        self
    }

    pub fn download_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(path.into());
        self
    }

    pub fn cache_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(path.into());
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn cache_only(mut self, cache_only: bool) -> Self {
        self.cache_only = cache_only;
        self
    }

    /// Resolve credentials against the process environment and build the
    /// configuration.
    pub fn build(self) -> Result<ClientConfig, KaggleError> {
        self.build_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`ClientOptions::build`] with an injected environment lookup.
    pub fn build_with_env(
        self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<ClientConfig, KaggleError> {
        let default_file = self
            .default_credentials_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE));

        let credentials = resolve_credentials(
            self.username.as_deref(),
            self.api_key.as_deref(),
            self.credentials_file.as_deref(),
            &default_file,
            env,
        )?;

        if !self.cache_only && !credentials.is_complete() {
            return Err(KaggleError::Authentication {
                message: "Username and API key are required (or set cache_only: true for cache-only access)"
                    .to_string(),
            });
        }

        let config = ClientConfig {
            credentials,
            download_dir: self
                .download_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_DIR)),
            cache_dir: self
                .cache_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR)),
            timeout: Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            cache_only: self.cache_only,
        };

        config.ensure_directories()?;
        Ok(config)
    }
}

/// Resolved client configuration. Immutable once built.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    credentials: Credentials,
    download_dir: PathBuf,
    cache_dir: PathBuf,
    timeout: Duration,
    cache_only: bool,
}

impl ClientConfig {
    pub fn username(&self) -> Option<&str> {
        self.credentials.username.as_deref()
    }

    pub fn api_key(&self) -> Option<&str> {
        self.credentials.api_key.as_deref()
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn cache_only(&self) -> bool {
        self.cache_only
    }

    fn ensure_directories(&self) -> Result<(), KaggleError> {
        for dir in [&self.download_dir, &self.cache_dir] {
            fs::create_dir_all(dir)?;
            debug!(path = %dir.display(), "ensured directory");
        }
        Ok(())
    }
}
