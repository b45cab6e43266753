//! HTTP protocol layer module
//!
//! Response builders, content-type lookup, cache validation and path
//! normalization, decoupled from the admin routing logic.

pub mod cache;
pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use path::{clean_path, decode_path, decoded_path, encode_path, join_under};
pub use response::{
    build_304_response, build_403_response, build_404_response, build_405_response,
    build_413_response, build_cached_response, build_html_response, build_json_response,
    build_redirect_response, build_text_response,
};
