// API module entry
// JSON and plain-text endpoints under /fabio/api

mod manual;
mod registry;
mod snapshot;

use async_trait::async_trait;
use hyper::StatusCode;

use crate::config::Config;
use crate::handler::{AdminHandler, AdminRequest, AdminResponse};
use crate::http;

// Re-export public types
pub use manual::{ManualHandler, ManualPathsHandler};
pub use registry::{MemoryRegistry, Registry};
pub use snapshot::RouteSnapshot;

/// Renders the running configuration
pub struct ConfigHandler {
    config: Config,
}

impl ConfigHandler {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AdminHandler for ConfigHandler {
    async fn handle(&self, _req: &AdminRequest) -> AdminResponse {
        http::build_json_response(StatusCode::OK, &self.config)
    }
}

/// Renders the proxy routing table, optionally filtered by `?prefix=`
pub struct RoutesHandler {
    snapshot: RouteSnapshot,
}

impl RoutesHandler {
    pub const fn new(snapshot: RouteSnapshot) -> Self {
        Self { snapshot }
    }
}

#[async_trait]
impl AdminHandler for RoutesHandler {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        let prefix = query_param(req, "prefix");
        let routes = self.snapshot.filtered(prefix.as_deref()).await;
        http::build_json_response(StatusCode::OK, &routes)
    }
}

/// Reports the version string
pub struct VersionHandler {
    version: String,
}

impl VersionHandler {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

#[async_trait]
impl AdminHandler for VersionHandler {
    async fn handle(&self, _req: &AdminRequest) -> AdminResponse {
        http::build_text_response(StatusCode::OK, &self.version)
    }
}

/// First value of a query parameter, without percent-decoding
pub fn query_param(req: &AdminRequest, name: &str) -> Option<String> {
    req.uri().query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouteEntry;
    use crate::handler::test_support::*;

    fn entry(service: &str, src: &str) -> RouteEntry {
        RouteEntry {
            service: service.to_string(),
            src: src.to_string(),
            dst: format!("http://{service}:8080/"),
            weight: 1.0,
            tags: vec!["urlprefix-".to_string()],
        }
    }

    #[test]
    fn test_query_param() {
        let req = get("/fabio/api/routes?a=1&prefix=/api&prefix=/x");
        assert_eq!(query_param(&req, "prefix").as_deref(), Some("/api"));
        assert_eq!(query_param(&req, "a").as_deref(), Some("1"));
        assert_eq!(query_param(&req, "missing"), None);
        assert_eq!(query_param(&get("/fabio/api/routes?prefix="), "prefix"), None);
    }

    #[tokio::test]
    async fn test_config_handler() {
        let cfg = Config::defaults().unwrap();
        let resp = ConfigHandler::new(cfg).handle(&get("/fabio/api/config")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value["registry"]["kv_path"], "/fabio/config");
        assert_eq!(value["admin"]["access"], "rw");
    }

    #[tokio::test]
    async fn test_routes_handler() {
        let snapshot = RouteSnapshot::new(vec![entry("web", "/"), entry("api", "/api")]);
        let h = RoutesHandler::new(snapshot);

        let resp = h.handle(&get("/fabio/api/routes")).await;
        let all: Vec<RouteEntry> = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(all.len(), 2);

        let resp = h.handle(&get("/fabio/api/routes?prefix=/api")).await;
        let api: Vec<RouteEntry> = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(api, vec![entry("api", "/api")]);
    }

    #[tokio::test]
    async fn test_version_handler() {
        let resp = VersionHandler::new("1.6.3").handle(&get("/fabio/api/version")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_string(resp).await, "1.6.3");
    }
}
