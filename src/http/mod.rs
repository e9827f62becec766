//! HTTP protocol layer module
//!
//! Response builders and content negotiation, decoupled from upload handling.

pub mod negotiate;
pub mod response;

// Re-export commonly used items
pub use negotiate::wants_json;
pub use response::{
    build_404_response, build_405_response, build_html_response, build_json_response,
    build_options_response, build_text_response,
};
