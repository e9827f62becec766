//! Shared fixtures for handler tests

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, Response};
use std::path::Path;

use crate::config::{AppState, Config};

const BOUNDARY: &str = "----wordcount-test-boundary";

/// Default configuration storing uploads in `folder`, access log off
pub fn test_state(folder: &Path) -> AppState {
    let mut config = Config::load_from("no-such-config-file").unwrap();
    config.upload.folder = folder.to_path_buf();
    config.logging.access_log = false;
    AppState::new(config)
}

/// Single-part multipart request; `file_name: None` sends a plain form value
pub fn multipart_request(
    method: Method,
    accept: Option<&str>,
    field: &str,
    file_name: Option<&str>,
    content: &[u8],
) -> Request<Full<Bytes>> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: text/plain\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder()
        .method(method)
        .uri("/")
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    if let Some(accept) = accept {
        builder = builder.header(ACCEPT, accept);
    }
    builder.body(Full::new(Bytes::from(body))).unwrap()
}

pub fn empty_request(method: Method, uri: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

pub async fn body_string(resp: Response<Full<Bytes>>) -> String {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Names of files currently in the upload folder, sorted
pub fn stored_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
