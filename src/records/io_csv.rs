//! CSV reader producing header-keyed [`Record`]s.
//!
//! The first row names the columns. Every following row becomes one record
//! with an entry per column; empty cells and cells missing from short rows
//! are `None`. Cells beyond the header width are dropped, and when a header
//! name repeats the first column wins.
//!
//! Input is checked for quoting errors before any record is decoded, so a
//! malformed file fails as a whole instead of yielding a partial result.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{ParsedResult, Record};
use crate::error::KaggleError;

/// Reads records from a CSV file.
///
/// # Errors
/// Fails with [`KaggleError::FileNotFound`] or [`KaggleError::NotCsv`]
/// before reading anything, and with [`KaggleError::CsvParse`] when the
/// content is malformed.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use kaggle_client::records::io_csv::parse_csv_file;
///
/// let records = parse_csv_file(Path::new("downloads/owner_name/train.csv"))?;
/// # Ok::<(), kaggle_client::KaggleError>(())
/// ```
pub fn parse_csv_file(path: &Path) -> Result<Vec<Record>, KaggleError> {
    if !path.exists() {
        return Err(KaggleError::FileNotFound(path.to_path_buf()));
    }
    if !is_csv_file(path) {
        return Err(KaggleError::NotCsv(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    records_from_slice(&bytes, path)
}

/// Reads records from a CSV string.
///
/// Useful for testing without file I/O.
pub fn from_csv_str(csv_str: &str) -> Result<Vec<Record>, KaggleError> {
    from_csv_slice(csv_str.as_bytes())
}

/// Reads records from CSV bytes.
///
/// Useful for fuzzing and processing raw bytes without requiring UTF-8 upfront.
pub fn from_csv_slice(bytes: &[u8]) -> Result<Vec<Record>, KaggleError> {
    records_from_slice(bytes, Path::new("<bytes>"))
}

/// True when `path` has a `.csv` extension, in any letter case.
pub fn is_csv_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// All CSV files below `root`, recursively, in path order.
pub fn collect_csv_files(root: &Path) -> Result<Vec<PathBuf>, KaggleError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| KaggleError::Io(source.into()))?;
        if entry.file_type().is_file() && is_csv_file(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}

/// Parse every CSV file below `root`.
///
/// Returns `None` when there is no CSV file. Files are keyed by stem; if two
/// files in different directories share a stem, the later one in path order
/// replaces the earlier.
pub fn parse_csv_tree(root: &Path) -> Result<Option<ParsedResult>, KaggleError> {
    let mut files = BTreeMap::new();

    for path in collect_csv_files(root)? {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let records = parse_csv_file(&path)?;
        debug!(path = %path.display(), records = records.len(), "parsed csv file");
        files.insert(stem, records);
    }

    Ok(ParsedResult::from_files(files))
}

fn records_from_slice(bytes: &[u8], path: &Path) -> Result<Vec<Record>, KaggleError> {
    check_quoting(bytes).map_err(|err| KaggleError::CsvParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    let mut rows = reader.records();

    let header = match rows.next() {
        Some(row) => row.map_err(|source| csv_error(path, source))?,
        None => return Ok(Vec::new()),
    };
    let columns: Vec<String> = header.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|source| csv_error(path, source))?;
        records.push(row_to_record(&columns, &row));
    }

    Ok(records)
}

fn row_to_record(columns: &[String], row: &csv::StringRecord) -> Record {
    let mut record = Record::new();
    for (index, column) in columns.iter().enumerate() {
        if record.contains_key(column) {
            continue;
        }
        let value = row
            .get(index)
            .filter(|cell| !cell.is_empty())
            .map(str::to_string);
        record.insert(column.clone(), value);
    }
    record
}

fn csv_error(path: &Path, source: csv::Error) -> KaggleError {
    KaggleError::CsvParse {
        path: path.to_path_buf(),
        message: source.to_string(),
    }
}

// ============================================================================
// Quoting check
// ============================================================================

/// A quoting error at a 1-based line.
#[derive(Debug, PartialEq, Eq)]
struct QuoteError {
    line: usize,
    message: &'static str,
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on line {}", self.message, self.line)
    }
}

#[derive(Clone, Copy)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Reject input the `csv` crate would otherwise accept leniently:
/// an unterminated quoted field, a quote inside an unquoted field, or
/// text after a closing quote.
fn check_quoting(bytes: &[u8]) -> Result<(), QuoteError> {
    let mut state = QuoteState::FieldStart;
    let mut line = 1;
    let mut quote_line = 1;
    let mut prev = 0u8;

    for &byte in bytes {
        let newline = byte == b'\n' || byte == b'\r';
        // CRLF counts once.
        if newline && !(byte == b'\n' && prev == b'\r') {
            line += 1;
        }
        prev = byte;

        state = match (state, byte) {
            (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b',') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) if newline => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, _) => {
                return Err(QuoteError {
                    line,
                    message: "unexpected text after closing quote",
                })
            }
            (QuoteState::FieldStart, b'"') => {
                quote_line = line;
                QuoteState::Quoted
            }
            (QuoteState::Unquoted, b'"') => {
                return Err(QuoteError {
                    line,
                    message: "illegal quote in unquoted field",
                })
            }
            (_, b',') => QuoteState::FieldStart,
            (_, _) if newline => QuoteState::FieldStart,
            (_, _) => QuoteState::Unquoted,
        };
    }

    match state {
        QuoteState::Quoted => Err(QuoteError {
            line: quote_line,
            message: "unterminated quoted field",
        }),
        _ => Ok(()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn record(pairs: &[(&str, Option<&str>)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    #[test]
    fn header_row_names_fields() {
        let records = from_csv_str("name,age\nJohn,30\nJane,25").expect("parse");
        assert_eq!(
            records,
            vec![
                record(&[("name", Some("John")), ("age", Some("30"))]),
                record(&[("name", Some("Jane")), ("age", Some("25"))]),
            ]
        );
    }

    #[test]
    fn missing_values_are_none() {
        let records = from_csv_str("name,age,city\nJohn,30,NYC\nJane,,LA\nBob,35,").expect("parse");
        assert_eq!(
            records,
            vec![
                record(&[("name", Some("John")), ("age", Some("30")), ("city", Some("NYC"))]),
                record(&[("name", Some("Jane")), ("age", None), ("city", Some("LA"))]),
                record(&[("name", Some("Bob")), ("age", Some("35")), ("city", None)]),
            ]
        );
    }

    #[test]
    fn short_rows_fill_with_none_and_long_rows_are_truncated() {
        let records = from_csv_str("a,b,c\n1\n1,2,3,4").expect("parse");
        assert_eq!(records[0], record(&[("a", Some("1")), ("b", None), ("c", None)]));
        assert_eq!(
            records[1],
            record(&[("a", Some("1")), ("b", Some("2")), ("c", Some("3"))])
        );
    }

    #[test]
    fn empty_and_header_only_inputs_have_no_records() {
        assert_eq!(from_csv_str("").expect("parse"), Vec::<Record>::new());
        assert_eq!(from_csv_str("name,age,email").expect("parse"), Vec::<Record>::new());
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let records = from_csv_str(
            "name,description\n\"Smith, John\",\"A person with a comma in name\"\n\"Doe, Jane\",\"Another person\"",
        )
        .expect("parse");
        assert_eq!(records[0]["name"].as_deref(), Some("Smith, John"));
        assert_eq!(records[1]["description"].as_deref(), Some("Another person"));
    }

    #[test]
    fn escaped_quotes_and_embedded_newlines() {
        let records =
            from_csv_str("quote,note\n\"He said \"\"hi\"\"\",\"two\nlines\"\n").expect("parse");
        assert_eq!(records[0]["quote"].as_deref(), Some("He said \"hi\""));
        assert_eq!(records[0]["note"].as_deref(), Some("two\nlines"));
    }

    #[test]
    fn line_endings_are_interchangeable() {
        for content in [
            "name,age\nJohn,30\nJane,25",
            "name,age\r\nJohn,30\r\nJane,25",
            "name,age\rJohn,30\rJane,25",
        ] {
            let records = from_csv_str(content).expect("parse");
            assert_eq!(records.len(), 2, "content: {content:?}");
            assert_eq!(records[1]["name"].as_deref(), Some("Jane"));
        }
    }

    #[test]
    fn unicode_values_survive() {
        let records = from_csv_str("name,symbol\nAlpha,α\nBeta,β").expect("parse");
        assert_eq!(records[1]["symbol"].as_deref(), Some("β"));
    }

    #[test]
    fn unterminated_quote_is_parse_error() {
        let err = from_csv_str("name,age\nJohn,\"unclosed quote\nJane,25").expect_err("malformed");
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("unterminated quoted field on line 2"));
    }

    #[test]
    fn stray_quotes_are_parse_errors() {
        assert!(from_csv_str("a,b\nab\"c,d").is_err());
        assert!(from_csv_str("a,b\n\"ab\"c,d").is_err());
    }

    #[test]
    fn invalid_utf8_is_parse_error() {
        let err = from_csv_slice(b"name,description\nTest,Caf\xe9").expect_err("invalid utf-8");
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[test]
    fn csv_detection_ignores_case() {
        assert!(is_csv_file(Path::new("test.csv")));
        assert!(is_csv_file(Path::new("test.CSV")));
        assert!(is_csv_file(Path::new("test.Csv")));
        assert!(!is_csv_file(Path::new("test.txt")));
        assert!(!is_csv_file(Path::new("test.json")));
        assert!(!is_csv_file(Path::new("test")));
    }

    #[test]
    fn file_checks_run_before_reading() {
        let temp = tempfile::tempdir().expect("tempdir");

        let err = parse_csv_file(&temp.path().join("missing.csv")).expect_err("missing");
        assert!(matches!(err, KaggleError::FileNotFound(_)));

        let txt = temp.path().join("notes.txt");
        fs::write(&txt, "Not a CSV").expect("write");
        let err = parse_csv_file(&txt).expect_err("not csv");
        assert!(matches!(err, KaggleError::NotCsv(_)));
        assert_eq!(err.kind(), ErrorKind::Generic);
    }

    #[test]
    fn large_files_keep_row_order() {
        let mut content = String::from("id,name,value\n");
        for i in 1..=1000 {
            content.push_str(&format!("{i},Item {i},{}\n", i * 10));
        }

        let records = from_csv_str(&content).expect("parse");
        assert_eq!(records.len(), 1000);
        assert_eq!(
            records[0],
            record(&[("id", Some("1")), ("name", Some("Item 1")), ("value", Some("10"))])
        );
        assert_eq!(records[999]["value"].as_deref(), Some("10000"));
    }

    #[test]
    fn tree_parse_shapes_by_file_count() {
        let temp = tempfile::tempdir().expect("tempdir");
        assert_eq!(parse_csv_tree(temp.path()).expect("parse"), None);

        fs::write(temp.path().join("train.csv"), "a\n1").expect("write");
        let single = parse_csv_tree(temp.path()).expect("parse").expect("some");
        assert_eq!(single.as_single().map(<[Record]>::len), Some(1));

        fs::create_dir(temp.path().join("nested")).expect("mkdir");
        fs::write(temp.path().join("nested").join("test.CSV"), "a\n2\n3").expect("write");
        fs::write(temp.path().join("readme.md"), "# data").expect("write");
        let multi = parse_csv_tree(temp.path()).expect("parse").expect("some");
        let files = multi.as_multi().expect("multi");
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["test", "train"]);
        assert_eq!(files["test"].len(), 2);
    }

    #[test]
    fn quoting_errors_report_line() {
        assert_eq!(
            check_quoting(b"a\nb\n\"c"),
            Err(QuoteError {
                line: 3,
                message: "unterminated quoted field"
            })
        );
        assert_eq!(check_quoting(b"a,\"b\r\nc\"\r\nd"), Ok(()));
    }
}
