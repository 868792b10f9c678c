//! Working archive handling: persist downloaded bytes, unpack them into the
//! extraction directory, and remove the archive afterwards.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::api::DatasetRef;
use crate::error::KaggleError;

/// Counts reported after a successful extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    pub directories: usize,
}

/// Path of the working archive for `dataset` under `download_root`.
pub fn archive_path(download_root: &Path, dataset: &DatasetRef) -> PathBuf {
    download_root.join(dataset.archive_file_name())
}

/// Write raw archive bytes to `path`.
pub fn save_archive(path: &Path, bytes: &[u8]) -> Result<(), KaggleError> {
    fs::write(path, bytes).map_err(KaggleError::Io)
}

/// Unpack every entry of the zip archive at `archive` into `destination`,
/// preserving relative paths.
///
/// Entries whose names would land outside `destination` are rejected.
pub fn extract_zip(archive: &Path, destination: &Path) -> Result<ExtractSummary, KaggleError> {
    let file = File::open(archive).map_err(KaggleError::Io)?;
    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|source| KaggleError::ArchiveExtract {
            path: archive.to_path_buf(),
            source,
        })?;

    fs::create_dir_all(destination).map_err(KaggleError::Io)?;

    let mut summary = ExtractSummary::default();
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|source| KaggleError::ArchiveExtract {
                path: archive.to_path_buf(),
                source,
            })?;

        let entry_name = entry.name().to_string();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| KaggleError::ArchiveEntry {
                path: archive.to_path_buf(),
                entry: entry_name.clone(),
                message: "entry path escapes the extraction directory".to_string(),
            })?;
        let target = destination.join(relative);

        let entry_error = |source: io::Error| KaggleError::ArchiveEntry {
            path: archive.to_path_buf(),
            entry: entry_name.clone(),
            message: source.to_string(),
        };

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(entry_error)?;
            summary.directories += 1;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(entry_error)?;
            }
            let mut out = File::create(&target).map_err(entry_error)?;
            io::copy(&mut entry, &mut out).map_err(entry_error)?;
            summary.files += 1;
        }
    }

    info!(
        archive = %archive.display(),
        destination = %destination.display(),
        files = summary.files,
        directories = summary.directories,
        "extracted archive"
    );
    Ok(summary)
}

/// Delete the working archive. Failure is logged and otherwise ignored.
pub fn remove_archive(path: &Path) {
    if let Err(source) = fs::remove_file(path) {
        if source.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %source, "failed to remove working archive");
        }
    }
}
