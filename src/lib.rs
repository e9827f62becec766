//! Word count upload service
//!
//! Accepts a single text file over `multipart/form-data`, stores it, rejects
//! binary content and answers with the number of whitespace-separated words,
//! as HTML or JSON depending on the `Accept` header.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod upload;
