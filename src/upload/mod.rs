//! Upload processing module
//!
//! Everything between "a multipart part arrived" and "a word count exists":
//! storing the part, classifying it, and counting its words.

pub mod classify;
pub mod count;
pub mod storage;

use hyper::StatusCode;
use serde::Serialize;
use thiserror::Error;

pub use classify::{is_binary, is_binary_file};
pub use count::{count_file_words, count_words};
pub use storage::{basename, stored_file_name, StoredFile};

/// Reasons an upload request does not produce a word count
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Form submitted without file")]
    MissingFile,
    #[error("Form submitted without file")]
    EmptyFilename,
    #[error("Uploaded file is binary object. Cannot count words in binary file")]
    BinaryContent,
    #[error("Wrong method submitted with form")]
    UnsupportedMethod,
    #[error("Uploaded file exceeds maximum size of {limit} bytes")]
    PayloadTooLarge { limit: u64 },
    #[error("Malformed multipart form")]
    MalformedForm(#[source] multer::Error),
    #[error("Failed to store uploaded file")]
    Storage(#[from] std::io::Error),
}

impl UploadError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MissingFile | Self::EmptyFilename | Self::BinaryContent | Self::MalformedForm(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnsupportedMethod => StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<multer::Error> for UploadError {
    fn from(err: multer::Error) -> Self {
        match err {
            multer::Error::StreamSizeExceeded { limit }
            | multer::Error::FieldSizeExceeded { limit, .. } => Self::PayloadTooLarge { limit },
            other => Self::MalformedForm(other),
        }
    }
}

/// Outcome of one upload, serialized straight into the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WordCountResult {
    Success { word_count: usize, file_name: String },
    Error {
        #[serde(rename = "error")]
        error_msg: String,
    },
}

impl From<&UploadError> for WordCountResult {
    fn from(err: &UploadError) -> Self {
        Self::Error {
            error_msg: err.to_string(),
        }
    }
}
