//! MIME type detection module
//!
//! Returns the Content-Type for an asset key based on its extension.

use std::path::Path;

/// Get MIME Content-Type for an asset key
///
/// Only the types the admin UI actually ships are listed; everything else
/// is served as `application/octet-stream`.
pub fn content_type_for(key: &str) -> &'static str {
    let extension = Path::new(key).extension().and_then(|e| e.to_str());
    match extension {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_asset_types() {
        assert_eq!(content_type_for("assets/logo.svg"), "image/svg+xml");
        assert_eq!(content_type_for("assets/css/main.css"), "text/css; charset=utf-8");
        assert_eq!(
            content_type_for("assets/code/main.js"),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for("assets/fonts/icons.woff2"), "font/woff2");
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(content_type_for("assets/blob.xyz"), "application/octet-stream");
        assert_eq!(content_type_for("assets/README"), "application/octet-stream");
    }
}
