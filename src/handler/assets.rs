//! Static asset serving module
//!
//! Serves files out of a read-only virtual tree. The public prefix is
//! stripped from the request path, the remainder is anchored under a fixed
//! root and looked up in the tree. Misses are plain 404s.

use async_trait::async_trait;
use hyper::body::Bytes;
use hyper::Method;
use std::collections::HashMap;

use super::{AdminHandler, AdminRequest, AdminResponse};
use crate::http::{self, cache, mime};

/// A read-only tree of files addressed by slash separated keys
pub trait AssetTree: Send + Sync {
    /// Open the file stored under `key`, `None` if there is none
    fn open(&self, key: &str) -> Option<Bytes>;
}

/// UI assets compiled into the binary
pub struct EmbeddedAssets {
    files: HashMap<&'static str, &'static [u8]>,
}

impl EmbeddedAssets {
    pub fn new() -> Self {
        let files = HashMap::from([
            (
                "assets/logo.svg",
                include_bytes!("../../assets/logo.svg").as_slice(),
            ),
            (
                "assets/logo.bw.svg",
                include_bytes!("../../assets/logo.bw.svg").as_slice(),
            ),
            (
                "assets/css/main.css",
                include_bytes!("../../assets/css/main.css").as_slice(),
            ),
            (
                "assets/code/manual.js",
                include_bytes!("../../assets/code/manual.js").as_slice(),
            ),
        ]);
        Self { files }
    }
}

impl Default for EmbeddedAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTree for EmbeddedAssets {
    fn open(&self, key: &str) -> Option<Bytes> {
        self.files.get(key).copied().map(Bytes::from_static)
    }
}

/// Serves `<prefix>/<path>` from `<root>/<path>` inside an asset tree
pub struct AssetHandler<T> {
    prefix: String,
    root: String,
    tree: T,
}

impl<T: AssetTree> AssetHandler<T> {
    pub fn new(prefix: impl Into<String>, tree: T, root: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            root: root.into(),
            tree,
        }
    }

    /// Map a full request path to a lookup key, `None` outside the prefix
    pub fn resolve(&self, request_path: &str) -> Option<String> {
        let stripped = request_path.strip_prefix(self.prefix.trim_end_matches('/'))?;
        if !stripped.is_empty() && !stripped.starts_with('/') {
            return None;
        }
        Some(http::join_under(&self.root, stripped))
    }
}

#[async_trait]
impl<T: AssetTree> AdminHandler for AssetHandler<T> {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        let is_head = match *req.method() {
            Method::GET => false,
            Method::HEAD => true,
            _ => return http::build_405_response("GET, HEAD"),
        };

        let Some(key) = self.resolve(&http::decoded_path(req.uri())) else {
            return http::build_404_response();
        };
        let Some(data) = self.tree.open(&key) else {
            return http::build_404_response();
        };

        let etag = cache::generate_etag(&data);
        let if_none_match = req
            .headers()
            .get("if-none-match")
            .and_then(|v| v.to_str().ok());
        if cache::check_etag_match(if_none_match, &etag) {
            return http::build_304_response(&etag);
        }

        http::build_cached_response(data, mime::content_type_for(&key), &etag, is_head)
    }
}
