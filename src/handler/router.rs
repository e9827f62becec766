//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: path dispatch, common headers and access logging.

use crate::config::AppState;
use crate::handler::upload;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderName, HeaderValue, REFERER, SERVER, USER_AGENT};
use hyper::{Method, Request, Response, StatusCode, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

const FORM_PATH: &str = "/";
const PING_PATH: &str = "/ping";

const FORM_METHODS: &str = "GET, HEAD, POST, OPTIONS";
const PING_METHODS: &str = "GET, HEAD, OPTIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Form,
    Ping,
    NotFound,
}

impl Route {
    fn from_path(path: &str) -> Self {
        match path {
            FORM_PATH => Self::Form,
            PING_PATH => Self::Ping,
            _ => Self::NotFound,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let access_entry = state
        .access_log_enabled()
        .then(|| build_access_entry(&req, peer_addr));

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    let mut response = route_request(req, &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if let Some(mut entry) = access_entry {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn route_request<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let enable_cors = state.config.http.enable_cors;
    match (Route::from_path(req.uri().path()), req.method().clone()) {
        (Route::Form, Method::OPTIONS) => http::build_options_response(FORM_METHODS, enable_cors),
        (Route::Form, _) => upload::handle_upload(req, state).await,
        (Route::Ping, Method::OPTIONS) => http::build_options_response(PING_METHODS, enable_cors),
        (Route::Ping, method @ (Method::GET | Method::HEAD)) => http::build_text_response(
            StatusCode::OK,
            format!("Pong! App Name: {}", state.config.server.app_name),
            method == Method::HEAD,
        ),
        (Route::Ping, method) => {
            logger::log_warning(&format!("Method not allowed on {PING_PATH}: {method}"));
            http::build_405_response(PING_METHODS)
        }
        (Route::NotFound, _) => http::build_404_response(),
    }
}

fn build_access_entry<B>(req: &Request<B>, peer_addr: SocketAddr) -> AccessLogEntry {
    let header = |name: HeaderName| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = match req.version() {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
    .to_string();
    entry.referer = header(REFERER);
    entry.user_agent = header(USER_AGENT);
    entry
}
