#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;

use kaggle_client::{
    ClientOptions, HttpRequest, HttpResponse, KaggleClient, Transport, TransportError,
};
use zip::write::SimpleFileOptions;

pub const DOWNLOAD_URL: &str = "https://www.kaggle.com/api/v1/datasets/download/test/dataset";
pub const FILES_URL: &str = "https://www.kaggle.com/api/v1/datasets/data/test/dataset";
pub const VIEW_URL: &str = "https://www.kaggle.com/api/v1/datasets/view/test/dataset";

/// In-memory transport answering from a URL table and recording every request.
#[derive(Default)]
pub struct MockTransport {
    routes: HashMap<String, Result<HttpResponse, TransportError>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let reason = match status {
            200 => "OK",
            403 => "Forbidden",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "",
        };
        self.routes.insert(
            url.to_string(),
            Ok(HttpResponse {
                status,
                reason: reason.to_string(),
                body: body.into(),
            }),
        );
        self
    }

    pub fn fail(mut self, url: &str, error: TransportError) -> Self {
        self.routes.insert(url.to_string(), Err(error));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.routes.get(&request.url).cloned().unwrap_or_else(|| {
            Ok(HttpResponse {
                status: 404,
                reason: "Not Found".to_string(),
                body: Vec::new(),
            })
        })
    }
}

/// Options with test credentials and directories under `root`.
pub fn options(root: &Path) -> ClientOptions {
    ClientOptions::new()
        .username("test_user")
        .api_key("test_key")
        .download_dir(root.join("downloads"))
        .cache_dir(root.join("cache"))
        .default_credentials_file(root.join("kaggle.json"))
}

pub fn client(root: &Path, transport: MockTransport) -> KaggleClient<MockTransport> {
    let config = options(root).build_with_env(|_| None).expect("build config");
    KaggleClient::with_transport(config, transport)
}

pub fn cache_only_client(root: &Path, transport: MockTransport) -> KaggleClient<MockTransport> {
    let config = ClientOptions::new()
        .cache_only(true)
        .download_dir(root.join("downloads"))
        .cache_dir(root.join("cache"))
        .default_credentials_file(root.join("kaggle.json"))
        .build_with_env(|_| None)
        .expect("build config");
    KaggleClient::with_transport(config, transport)
}

/// Zip archive holding `entries` as (name, content) pairs.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start file");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}
