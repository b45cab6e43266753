//! Request handler module
//!
//! Defines the handler capability every route binding points at, plus the
//! fixed-outcome handlers the router itself needs (forbidden, not found,
//! redirect, health). Concrete data handlers live in `api` and `ui`.

pub mod assets;

use async_trait::async_trait;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};
use std::sync::Arc;

use crate::http;

/// Request with a fully collected body
pub type AdminRequest = Request<Bytes>;
/// Response produced by every admin handler
pub type AdminResponse = Response<Full<Bytes>>;

/// A capability bound to a route pattern
///
/// Implementations pick their own status codes; the router passes them
/// through untouched.
#[async_trait]
pub trait AdminHandler: Send + Sync {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse;
}

/// Shared handler reference stored in the routing table
pub type SharedHandler = Arc<dyn AdminHandler>;

/// Answers 403 `Forbidden` regardless of method or body
pub struct ForbiddenHandler;

#[async_trait]
impl AdminHandler for ForbiddenHandler {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        crate::logger::log_forbidden(req.uri().path());
        http::build_403_response()
    }
}

/// Always answers 404
pub struct NotFoundHandler;

#[async_trait]
impl AdminHandler for NotFoundHandler {
    async fn handle(&self, _req: &AdminRequest) -> AdminResponse {
        http::build_404_response()
    }
}

/// Redirects every request to a fixed target
pub struct RedirectHandler {
    target: String,
    status: StatusCode,
}

impl RedirectHandler {
    pub fn new(target: impl Into<String>, status: StatusCode) -> Self {
        Self {
            target: target.into(),
            status,
        }
    }
}

#[async_trait]
impl AdminHandler for RedirectHandler {
    async fn handle(&self, _req: &AdminRequest) -> AdminResponse {
        http::build_redirect_response(&self.target, self.status)
    }
}

/// Liveness probe
pub struct HealthHandler;

#[async_trait]
impl AdminHandler for HealthHandler {
    async fn handle(&self, _req: &AdminRequest) -> AdminResponse {
        http::build_text_response(StatusCode::OK, "OK")
    }
}
