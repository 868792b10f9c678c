use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::constants::{KEY_ENV, USERNAME_ENV};
use crate::error::KaggleError;

/// Username and API key as found, before any validity check.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: Option<String>,
    pub api_key: Option<String>,
}

impl Credentials {
    /// Both values present and not blank.
    pub fn is_complete(&self) -> bool {
        is_present(self.username.as_deref()) && is_present(self.api_key.as_deref())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// On-disk shape of `kaggle.json`.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    username: Option<String>,
    key: Option<String>,
}

/// Resolve credentials in priority order.
///
/// 1. `explicit_file`, which must exist and parse; explicit values override it per field.
/// 2. `default_file`, only when no explicit value was given and it exists.
/// 3. Explicit values per field, falling back to the environment.
pub fn resolve_credentials(
    username: Option<&str>,
    api_key: Option<&str>,
    explicit_file: Option<&Path>,
    default_file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Credentials, KaggleError> {
    if let Some(path) = explicit_file {
        let file = load_credentials_file(path)?;
        debug!(path = %path.display(), "loaded credentials file");
        return Ok(Credentials {
            username: username.map(str::to_string).or(file.username),
            api_key: api_key.map(str::to_string).or(file.key),
        });
    }

    if username.is_none() && api_key.is_none() && default_file.is_file() {
        let file = load_credentials_file(default_file)?;
        debug!(path = %default_file.display(), "loaded default credentials file");
        return Ok(Credentials {
            username: file.username,
            api_key: file.key,
        });
    }

    Ok(Credentials {
        username: username.map(str::to_string).or_else(|| env(USERNAME_ENV)),
        api_key: api_key.map(str::to_string).or_else(|| env(KEY_ENV)),
    })
}

fn load_credentials_file(path: &Path) -> Result<CredentialsFile, KaggleError> {
    let content = fs::read_to_string(path).map_err(|source| KaggleError::CredentialsFile {
        path: path.to_path_buf(),
        message: format!("failed to read credentials file: {source}"),
    })?;

    serde_json::from_str(&content).map_err(|source| KaggleError::CredentialsFile {
        path: path.to_path_buf(),
        message: format!("invalid credentials file format: {source}"),
    })
}

fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}
