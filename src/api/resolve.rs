use std::str::FromStr;

use crate::error::KaggleError;

use super::DatasetRef;

impl DatasetRef {
    /// Build a reference from its two segments.
    ///
    /// Segments may only contain ASCII letters, digits, `-` and `.`. The
    /// path separator and `_` are rejected because the cache key and the
    /// extraction directory both flatten `owner/name` to `owner_name`.
    pub fn new(owner: &str, name: &str) -> Result<Self, KaggleError> {
        let input = format!("{owner}/{name}");
        validate_segment(&input, "owner", owner)?;
        validate_segment(&input, "name", name)?;

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse `owner/name` or a dataset URL. See [`parse_dataset_input`].
    pub fn parse(input: &str) -> Result<Self, KaggleError> {
        parse_dataset_input(input)
    }
}

impl FromStr for DatasetRef {
    type Err = KaggleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_dataset_input(s)
    }
}

/// Parse a user-supplied dataset reference (`owner/name` or a dataset URL).
pub fn parse_dataset_input(input: &str) -> Result<DatasetRef, KaggleError> {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return parse_dataset_url(trimmed);
    }

    let mut parts = trimmed.split('/');
    let owner = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    if parts.next().is_some() {
        return Err(KaggleError::InvalidDataset {
            input: input.to_string(),
            message: "expected dataset in '<owner>/<name>' form".to_string(),
        });
    }

    DatasetRef::new(owner, name)
}

fn parse_dataset_url(input: &str) -> Result<DatasetRef, KaggleError> {
    let url = url::Url::parse(input).map_err(|source| KaggleError::InvalidDataset {
        input: input.to_string(),
        message: format!("invalid URL: {source}"),
    })?;

    let host = url
        .host_str()
        .ok_or_else(|| KaggleError::InvalidDataset {
            input: input.to_string(),
            message: "URL is missing a host".to_string(),
        })?
        .to_ascii_lowercase();

    if host != "www.kaggle.com" && host != "kaggle.com" {
        return Err(KaggleError::InvalidDataset {
            input: input.to_string(),
            message: format!("expected host 'www.kaggle.com', found '{host}'"),
        });
    }

    let segments: Vec<&str> = url
        .path_segments()
        .map(|iter| iter.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    if segments.len() < 3 || segments[0] != "datasets" {
        return Err(KaggleError::InvalidDataset {
            input: input.to_string(),
            message: "expected dataset URL like https://www.kaggle.com/datasets/<owner>/<name>"
                .to_string(),
        });
    }

    DatasetRef::new(segments[1], segments[2])
}

fn validate_segment(input: &str, label: &str, segment: &str) -> Result<(), KaggleError> {
    if segment.is_empty() {
        return Err(KaggleError::InvalidDataset {
            input: input.to_string(),
            message: format!("{label} must not be empty"),
        });
    }

    if let Some(bad) = segment
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
    {
        return Err(KaggleError::InvalidDataset {
            input: input.to_string(),
            message: format!(
                "{label} contains '{bad}'; only ASCII letters, digits, '-' and '.' are allowed"
            ),
        });
    }

    if segment == "." || segment == ".." {
        return Err(KaggleError::InvalidDataset {
            input: input.to_string(),
            message: format!("{label} must not be a relative path component"),
        });
    }

    Ok(())
}
