use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::constants::{ACCEPT, BASE_URL, DOWNLOAD_ENDPOINT, USER_AGENT};
use crate::error::KaggleError;

use super::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use super::DatasetRef;

/// Absolute URL of `endpoint` for `dataset`, e.g.
/// `https://www.kaggle.com/api/v1/datasets/download/owner/name`.
pub fn endpoint_url(endpoint: &str, dataset: &DatasetRef) -> Result<String, KaggleError> {
    let mut url = url::Url::parse(BASE_URL).map_err(|source| KaggleError::Request {
        url: BASE_URL.to_string(),
        message: format!("invalid base URL: {source}"),
    })?;

    url.path_segments_mut()
        .map_err(|()| KaggleError::Request {
            url: BASE_URL.to_string(),
            message: "base URL cannot carry path segments".to_string(),
        })?
        .extend(endpoint.split('/'))
        .push(dataset.owner())
        .push(dataset.name());

    Ok(url.into())
}

/// Build the request for `url` from the client configuration alone.
pub fn build_request(config: &ClientConfig, url: String) -> HttpRequest {
    let mut headers = vec![
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        ("Accept".to_string(), ACCEPT.to_string()),
    ];

    if let (Some(username), Some(api_key)) = (config.username(), config.api_key()) {
        let token = STANDARD.encode(format!("{username}:{api_key}"));
        headers.push(("Authorization".to_string(), format!("Basic {token}")));
    }

    HttpRequest {
        url,
        headers,
        timeout: config.timeout(),
    }
}

/// Download the raw archive bytes for `dataset`.
pub fn fetch_archive<T: Transport>(
    transport: &T,
    config: &ClientConfig,
    dataset: &DatasetRef,
) -> Result<Vec<u8>, KaggleError> {
    let response = send(transport, config, DOWNLOAD_ENDPOINT, dataset)?;

    if !response.is_success() {
        return Err(KaggleError::Download {
            dataset: dataset.path(),
            status: response.status,
            message: response.status_line(),
        });
    }

    info!(
        dataset = %dataset,
        bytes = response.body.len(),
        "downloaded dataset archive"
    );
    Ok(response.body)
}

/// Fetch a JSON document describing `dataset` from `endpoint`.
///
/// A non-success status means the dataset is missing or not visible to
/// these credentials; a success with an unparsable body is a parse error.
pub fn fetch_json<T: Transport>(
    transport: &T,
    config: &ClientConfig,
    endpoint: &str,
    dataset: &DatasetRef,
) -> Result<Value, KaggleError> {
    let response = send(transport, config, endpoint, dataset)?;

    if !response.is_success() {
        return Err(KaggleError::DatasetNotFound {
            dataset: dataset.path(),
            status: response.status,
        });
    }

    serde_json::from_slice(&response.body).map_err(|source| KaggleError::ResponseParse {
        dataset: dataset.path(),
        source,
    })
}

fn send<T: Transport>(
    transport: &T,
    config: &ClientConfig,
    endpoint: &str,
    dataset: &DatasetRef,
) -> Result<HttpResponse, KaggleError> {
    let url = endpoint_url(endpoint, dataset)?;
    if config.cache_only() {
        return Err(KaggleError::NetworkDisabled { url });
    }

    let request = build_request(config, url);
    debug!(url = %request.url, "sending request");

    transport.execute(&request).map_err(|source| match source {
        TransportError::Timeout => KaggleError::RequestTimeout { url: request.url },
        TransportError::Failed(message) => KaggleError::Request {
            url: request.url,
            message,
        },
    })
}
