//! Upload form handler
//!
//! GET shows the form. POST stores the `destfile` part, rejects binary content
//! and answers with the word count. Every other method is refused with 405.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, ACCEPT, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Method, Request, Response, StatusCode};

use super::formatter;
use crate::config::{AppState, UploadConfig};
use crate::http;
use crate::logger;
use crate::upload::{self, storage, UploadError, WordCountResult};

/// Multipart field carrying the file
pub const UPLOAD_FIELD: &str = "destfile";

pub async fn handle_upload<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let wants_json = http::wants_json(req.headers().get(ACCEPT).and_then(|v| v.to_str().ok()));
    let method = req.method().clone();

    match method {
        Method::GET | Method::HEAD => {
            let is_head = method == Method::HEAD;
            http::build_html_response(StatusCode::OK, formatter::render_page(None), is_head)
        }
        Method::POST => match process_upload(req, &state.config.upload).await {
            Ok(result) => respond(StatusCode::OK, &result, wants_json),
            Err(err) => {
                log_rejection(&err);
                respond(err.status(), &WordCountResult::from(&err), wants_json)
            }
        },
        _ => {
            let err = UploadError::UnsupportedMethod;
            logger::log_error(&format!("{err}: {method}"));
            respond(err.status(), &WordCountResult::from(&err), wants_json)
        }
    }
}

/// Run one POST through store, classify and count
async fn process_upload<B>(
    req: Request<B>,
    upload: &UploadConfig,
) -> Result<WordCountResult, UploadError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    check_content_length(req.headers(), upload.max_content_length)?;

    // Anything that is not multipart/form-data carries no file part.
    let boundary = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or(UploadError::MissingFile)?;

    let constraints = multer::Constraints::new()
        .size_limit(multer::SizeLimit::new().whole_stream(upload.max_content_length));
    let mut multipart = multer::Multipart::with_constraints(
        req.into_body().into_data_stream(),
        boundary,
        constraints,
    );

    let stored = loop {
        let Some(mut field) = multipart.next_field().await? else {
            return Err(UploadError::MissingFile);
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        // A part without a filename is a plain form value, not a file.
        let Some(file_name) = field.file_name().map(|n| storage::basename(n).to_string()) else {
            continue;
        };
        if file_name.is_empty() {
            return Err(UploadError::EmptyFilename);
        }
        break storage::persist_field(&mut field, &upload.folder, &file_name).await?;
    };
    logger::log_upload_stored(&stored.path, stored.bytes);

    if upload::is_binary_file(&stored.path).await? {
        return Err(UploadError::BinaryContent);
    }

    let word_count = upload::count_file_words(&stored.path).await?;
    logger::log_word_count(&stored.file_name, word_count);

    Ok(WordCountResult::Success {
        word_count,
        file_name: stored.file_name,
    })
}

/// Reject requests whose declared `Content-Length` exceeds the limit
fn check_content_length(headers: &HeaderMap, max_content_length: u64) -> Result<(), UploadError> {
    let Some(content_length) = headers.get(CONTENT_LENGTH) else {
        return Ok(());
    };
    let Ok(size_str) = content_length.to_str() else {
        logger::log_warning("Content-Length header contains non-ASCII characters");
        return Ok(());
    };
    match size_str.parse::<u64>() {
        Ok(size) if size > max_content_length => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_content_length})"
            ));
            Err(UploadError::PayloadTooLarge {
                limit: max_content_length,
            })
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', relying on stream limit"
            ));
            Ok(())
        }
        _ => Ok(()),
    }
}

fn log_rejection(err: &UploadError) {
    match err {
        UploadError::MissingFile => logger::log_warning("Posted form missing destfile field"),
        UploadError::EmptyFilename => logger::log_warning("No file selected for upload"),
        UploadError::BinaryContent => logger::log_error("Binary file uploaded"),
        UploadError::MalformedForm(e) => logger::log_warning(&format!("{err}: {e}")),
        UploadError::Storage(e) => logger::log_error(&format!("{err}: {e}")),
        UploadError::PayloadTooLarge { .. } | UploadError::UnsupportedMethod => {
            logger::log_warning(&err.to_string());
        }
    }
}

fn respond(status: StatusCode, result: &WordCountResult, wants_json: bool) -> Response<Full<Bytes>> {
    let body = formatter::format(result, wants_json);
    if wants_json {
        http::build_json_response(status, body, false)
    } else {
        http::build_html_response(status, body, false)
    }
}
