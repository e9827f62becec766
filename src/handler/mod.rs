//! Request handler module
//!
//! Routing dispatch, the upload form handler and response rendering.

pub mod formatter;
pub mod router;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main entry point
pub use router::handle_request;
pub use upload::UPLOAD_FIELD;
