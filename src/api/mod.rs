//! Kaggle API plumbing.
//!
//! This module owns remote-specific concerns (dataset resolution, the HTTP
//! transport seam, and the authenticated fetches). Turning downloaded bytes
//! into files and records is left to `crate::archive` and `crate::records`.

pub mod fetch;
pub mod resolve;
pub mod transport;

use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::CACHE_SUFFIX;

/// Canonical reference to a Kaggle dataset.
///
/// Construct through [`DatasetRef::new`] or [`resolve::parse_dataset_input`];
/// both reject segments that would make the derived file names ambiguous.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DatasetRef {
    owner: String,
    name: String,
}

impl DatasetRef {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The remote dataset path, `owner/name`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The dataset path with its separator flattened, `owner_name`.
    fn flat_name(&self) -> String {
        format!("{}_{}", self.owner, self.name)
    }

    /// File name of the parsed-data cache entry, `owner_name_parsed.json`.
    pub fn cache_key(&self) -> String {
        format!("{}{}", self.flat_name(), CACHE_SUFFIX)
    }

    /// File name of the working archive written under the download root.
    pub fn archive_file_name(&self) -> String {
        format!("{}.zip", self.flat_name())
    }

    /// Directory the archive is extracted into.
    pub fn extraction_dir(&self, download_root: &Path) -> PathBuf {
        download_root.join(self.flat_name())
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_names_follow_layout() {
        let dataset = DatasetRef::new("owner", "dataset-name").expect("valid");
        assert_eq!(dataset.path(), "owner/dataset-name");
        assert_eq!(dataset.cache_key(), "owner_dataset-name_parsed.json");
        assert_eq!(dataset.archive_file_name(), "owner_dataset-name.zip");
        assert_eq!(
            dataset.extraction_dir(Path::new("downloads")),
            Path::new("downloads").join("owner_dataset-name")
        );
    }

    #[test]
    fn display_matches_path() {
        let dataset = DatasetRef::new("test-owner", "test-dataset").expect("valid");
        assert_eq!(dataset.to_string(), dataset.path());
    }
}
