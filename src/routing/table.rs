//! Routing table module
//!
//! Immutable path → handler table with conventional multiplexer semantics:
//! patterns ending in `/` match a whole subtree, all other patterns match
//! exactly. Exact matches beat prefixes, longer prefixes beat shorter ones.

use hyper::StatusCode;
use std::collections::HashMap;

use crate::error::AdminError;
use crate::handler::{AdminRequest, AdminResponse, SharedHandler};
use crate::http;

/// How a binding matches request paths
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Prefix,
}

/// One pattern bound to one handler
pub struct RouteBinding {
    pattern: String,
    kind: MatchKind,
    name: &'static str,
    handler: SharedHandler,
}

impl RouteBinding {
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub const fn kind(&self) -> MatchKind {
        self.kind
    }

    /// Label of the bound capability, used for logging
    pub const fn name(&self) -> &'static str {
        self.name
    }

    fn matches(&self, path: &str) -> bool {
        match self.kind {
            MatchKind::Exact => path == self.pattern,
            MatchKind::Prefix => path.starts_with(&self.pattern),
        }
    }
}

/// Collects bindings and freezes them into a `RoutingTable`
#[derive(Default)]
pub struct RoutingTableBuilder {
    bindings: Vec<RouteBinding>,
}

impl RoutingTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `pattern` to `handler`
    ///
    /// Registering the same pattern twice is a construction error.
    pub fn bind(
        mut self,
        pattern: &str,
        name: &'static str,
        handler: SharedHandler,
    ) -> Result<Self, AdminError> {
        if !pattern.starts_with('/') {
            return Err(AdminError::InvalidPattern(pattern.to_string()));
        }
        if self.bindings.iter().any(|b| b.pattern == pattern) {
            return Err(AdminError::DuplicatePattern(pattern.to_string()));
        }

        let kind = if pattern.ends_with('/') {
            MatchKind::Prefix
        } else {
            MatchKind::Exact
        };
        self.bindings.push(RouteBinding {
            pattern: pattern.to_string(),
            kind,
            name,
            handler,
        });
        Ok(self)
    }

    pub fn build(self) -> RoutingTable {
        let mut exact = HashMap::new();
        let mut prefixes = Vec::new();
        for (index, binding) in self.bindings.iter().enumerate() {
            match binding.kind {
                MatchKind::Exact => {
                    exact.insert(binding.pattern.clone(), index);
                }
                MatchKind::Prefix => prefixes.push(index),
            }
        }
        // Longest prefix first so the first hit is the most specific one
        prefixes.sort_by(|a: &usize, b: &usize| {
            self.bindings[*b]
                .pattern
                .len()
                .cmp(&self.bindings[*a].pattern.len())
        });

        RoutingTable {
            bindings: self.bindings,
            exact,
            prefixes,
        }
    }
}

/// Resolved, read-only routing table
pub struct RoutingTable {
    bindings: Vec<RouteBinding>,
    exact: HashMap<String, usize>,
    /// Indexes into `bindings`, longest pattern first
    prefixes: Vec<usize>,
}

impl RoutingTable {
    /// All bindings in registration order
    pub fn bindings(&self) -> impl Iterator<Item = &RouteBinding> {
        self.bindings.iter()
    }

    /// Find the most specific binding for a path
    pub fn lookup(&self, path: &str) -> Option<&RouteBinding> {
        if let Some(&index) = self.exact.get(path) {
            return Some(&self.bindings[index]);
        }
        self.prefixes
            .iter()
            .map(|&index| &self.bindings[index])
            .find(|binding| binding.matches(path))
    }

    /// Whether `pattern` is bound as a subtree
    fn has_prefix(&self, pattern: &str) -> bool {
        self.prefixes
            .iter()
            .any(|&index| self.bindings[index].pattern == pattern)
    }

    /// Dispatch a request to its binding
    ///
    /// Matching runs on the percent-decoded path. Non-canonical paths are
    /// redirected to their cleaned form first, so a binding is only ever
    /// selected for the path it was registered under. A path naming a
    /// subtree without its trailing slash is redirected into the subtree,
    /// unless it is bound exactly.
    pub async fn dispatch(&self, req: &AdminRequest) -> AdminResponse {
        let Some(path) = http::decode_path(req.uri().path()) else {
            return http::build_text_response(StatusCode::BAD_REQUEST, "400 Bad Request");
        };

        let cleaned = http::clean_path(&path);
        if cleaned != path {
            return redirect(&cleaned, req.uri().query());
        }

        if !self.exact.contains_key(&*path) && !path.ends_with('/') {
            let subtree = format!("{path}/");
            if self.has_prefix(&subtree) {
                return redirect(&subtree, req.uri().query());
            }
        }

        match self.lookup(&path) {
            Some(binding) => binding.handler.handle(req).await,
            None => http::build_404_response(),
        }
    }
}

/// 301 to a decoded path, keeping the original query
fn redirect(path: &str, query: Option<&str>) -> AdminResponse {
    let mut target = http::encode_path(path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }
    http::build_redirect_response(&target, StatusCode::MOVED_PERMANENTLY)
}
