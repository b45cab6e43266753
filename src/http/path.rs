//! Request path normalization
//!
//! Lexical cleaning only; nothing here touches a filesystem.

use hyper::Uri;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use std::borrow::Cow;

/// Bytes escaped when a decoded path goes back into a `Location` header
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-decode a request path, `None` if the result is not UTF-8
pub fn decode_path(path: &str) -> Option<Cow<'_, str>> {
    percent_decode_str(path).decode_utf8().ok()
}

/// Escape a decoded path for use in a URL
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, PATH_ESCAPE).to_string()
}

/// Decoded path of a request URI
///
/// The routing table rejects undecodable paths before any handler runs, so
/// the raw fallback only matters for handlers driven directly.
pub fn decoded_path(uri: &Uri) -> Cow<'_, str> {
    decode_path(uri.path()).unwrap_or(Cow::Borrowed(uri.path()))
}

/// Return the canonical form of a rooted request path
///
/// Empty and `.` segments are dropped, `..` removes the previous segment and
/// can never climb above `/`. A trailing slash is kept so subtree patterns
/// still match.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in &segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if cleaned.is_empty() {
        cleaned.push('/');
    } else if path.ends_with('/') {
        cleaned.push('/');
    }
    cleaned
}

/// Join a request path onto a fixed root
///
/// The path is cleaned as if rooted at `/` before joining, so the result is
/// always `root` or a key below it.
pub fn join_under(root: &str, path: &str) -> String {
    let root = root.trim_start_matches("./").trim_end_matches('/');
    let cleaned = clean_path(path);
    let relative = cleaned.trim_matches('/');
    if relative.is_empty() {
        root.to_string()
    } else {
        format!("{root}/{relative}")
    }
}
