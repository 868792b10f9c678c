//! JSON serialization of [`ParsedResult`] for the on-disk cache.
//!
//! Writes go through a temporary file in the destination directory that is
//! renamed over the target, so a reader sees either the previous entry or
//! the complete new one.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use super::ParsedResult;
use crate::error::KaggleError;

/// Reads a parsed result from a cache file.
///
/// # Errors
/// Returns an error if the file cannot be read or does not hold a record
/// sequence or a mapping of record sequences.
pub fn read_parsed_json(path: &Path) -> Result<ParsedResult, KaggleError> {
    let file = File::open(path).map_err(KaggleError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| KaggleError::CacheParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a parsed result to a cache file, replacing any existing one.
pub fn write_parsed_json(path: &Path, result: &ParsedResult) -> Result<(), KaggleError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(dir).map_err(KaggleError::Io)?;

    let mut writer = BufWriter::new(temp);
    serde_json::to_writer_pretty(&mut writer, result).map_err(|source| {
        KaggleError::CacheWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(KaggleError::Io)?;

    let temp = writer
        .into_inner()
        .map_err(|e| KaggleError::Io(e.into_error()))?;
    temp.persist(path)
        .map_err(|e| KaggleError::Io(e.error))?;

    Ok(())
}

/// Reads a parsed result from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<ParsedResult, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a parsed result from JSON bytes.
pub fn from_json_slice(bytes: &[u8]) -> Result<ParsedResult, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a parsed result to a JSON string.
pub fn to_json_string(result: &ParsedResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
