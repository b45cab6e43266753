// Manual configuration API module
// Reads and writes manual routing overrides stored in the registry

use async_trait::async_trait;
use hyper::{Method, StatusCode};
use serde::Deserialize;
use std::sync::Arc;

use super::registry::{KvEntry, Registry};
use crate::error::RegistryError;
use crate::handler::{AdminHandler, AdminRequest, AdminResponse};
use crate::http;
use crate::logger;

/// Body accepted by PUT/POST on the manual endpoint
#[derive(Debug, Deserialize)]
struct ManualUpdate {
    value: String,
    /// Version the client last read; omitted means unconditional write
    #[serde(default)]
    version: Option<u64>,
}

/// `GET|PUT|POST <base>[/<name>]` for the manual config stored at `<prefix>[/<name>]`
pub struct ManualHandler {
    base_path: String,
    prefix: String,
    registry: Arc<dyn Registry>,
}

impl ManualHandler {
    pub fn new(
        base_path: impl Into<String>,
        prefix: impl Into<String>,
        registry: Arc<dyn Registry>,
    ) -> Self {
        Self {
            base_path: base_path.into(),
            prefix: prefix.into(),
            registry,
        }
    }

    /// Registry key addressed by a request path
    pub fn key_for(&self, path: &str) -> String {
        let name = path
            .strip_prefix(&self.base_path)
            .unwrap_or("")
            .trim_matches('/');
        if name.is_empty() {
            self.prefix.clone()
        } else {
            format!("{}/{name}", self.prefix)
        }
    }

    async fn read(&self, key: &str) -> AdminResponse {
        match self.registry.get(key).await {
            Ok(Some(entry)) => http::build_json_response(StatusCode::OK, &entry),
            // An absent key reads as an empty config nobody has written yet
            Ok(None) => http::build_json_response(
                StatusCode::OK,
                &KvEntry {
                    value: String::new(),
                    version: 0,
                },
            ),
            Err(e) => registry_error_response(&e),
        }
    }

    async fn write(&self, key: &str, body: &[u8]) -> AdminResponse {
        let update: ManualUpdate = match serde_json::from_slice(body) {
            Ok(u) => u,
            Err(e) => {
                return http::build_json_response(
                    StatusCode::BAD_REQUEST,
                    &serde_json::json!({ "error": format!("invalid body: {e}") }),
                );
            }
        };

        let value = update.value.clone();
        match self.registry.put(key, update.value, update.version).await {
            Ok(version) => {
                http::build_json_response(StatusCode::OK, &KvEntry { value, version })
            }
            Err(e) => registry_error_response(&e),
        }
    }
}

#[async_trait]
impl AdminHandler for ManualHandler {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        let key = self.key_for(&http::decoded_path(req.uri()));
        match *req.method() {
            Method::GET | Method::HEAD => self.read(&key).await,
            Method::PUT | Method::POST => self.write(&key, req.body()).await,
            _ => http::build_405_response("GET, HEAD, PUT, POST"),
        }
    }
}

/// Lists the manual config paths stored below the registry prefix
pub struct ManualPathsHandler {
    prefix: String,
    registry: Arc<dyn Registry>,
}

impl ManualPathsHandler {
    pub fn new(prefix: impl Into<String>, registry: Arc<dyn Registry>) -> Self {
        Self {
            prefix: prefix.into(),
            registry,
        }
    }
}

#[async_trait]
impl AdminHandler for ManualPathsHandler {
    async fn handle(&self, req: &AdminRequest) -> AdminResponse {
        if !matches!(*req.method(), Method::GET | Method::HEAD) {
            return http::build_405_response("GET, HEAD");
        }

        match self.registry.list(&self.prefix).await {
            Ok(keys) => {
                // Report paths relative to the prefix: "" for the prefix itself
                let paths: Vec<&str> = keys
                    .iter()
                    .filter_map(|k| k.strip_prefix(&self.prefix))
                    .collect();
                http::build_json_response(StatusCode::OK, &paths)
            }
            Err(e) => registry_error_response(&e),
        }
    }
}

/// Collaborator errors keep their own status; they are not rewrapped upstream
fn registry_error_response(err: &RegistryError) -> AdminResponse {
    let status = match err {
        RegistryError::InvalidKey(_) => StatusCode::BAD_REQUEST,
        RegistryError::VersionMismatch { .. } => StatusCode::CONFLICT,
        RegistryError::Unavailable(_) => {
            logger::log_error(&format!("registry request failed: {err}"));
            StatusCode::BAD_GATEWAY
        }
    };
    http::build_json_response(status, &serde_json::json!({ "error": err.to_string() }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::registry::MemoryRegistry;
    use crate::handler::test_support::*;

    fn registry() -> Arc<dyn Registry> {
        Arc::new(MemoryRegistry::new())
    }

    fn manual(reg: &Arc<dyn Registry>) -> ManualHandler {
        ManualHandler::new("/fabio/api/manual", "fabio/config", Arc::clone(reg))
    }

    #[test]
    fn test_key_for() {
        let h = manual(&registry());
        assert_eq!(h.key_for("/fabio/api/manual"), "fabio/config");
        assert_eq!(h.key_for("/fabio/api/manual/"), "fabio/config");
        assert_eq!(h.key_for("/fabio/api/manual/canary"), "fabio/config/canary");
        assert_eq!(h.key_for("/fabio/api/manual/a/b"), "fabio/config/a/b");
    }

    #[tokio::test]
    async fn test_read_missing_is_empty() {
        let h = manual(&registry());
        let resp = h.handle(&get("/fabio/api/manual")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value, serde_json::json!({ "value": "", "version": 0 }));

        // The version read back is a valid precondition for the first write
        let resp = h
            .handle(&request("PUT", "/fabio/api/manual", r#"{"value":"x","version":0}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_name_is_decoded() {
        let h = manual(&registry());
        let resp = h
            .handle(&request("PUT", "/fabio/api/manual/can%61ry", r#"{"value":"y"}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = h.handle(&get("/fabio/api/manual/canary")).await;
        assert!(body_string(resp).await.contains("\"y\""));
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let reg = registry();
        let h = manual(&reg);
        let resp = h
            .handle(&request(
                "PUT",
                "/fabio/api/manual/canary",
                r#"{"value":"route add svc / http://a/"}"#,
            ))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = h.handle(&get("/fabio/api/manual/canary")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value["value"], "route add svc / http://a/");
        assert_eq!(value["version"], 1);

        assert!(reg.get("fabio/config/canary").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_stale_write_conflicts() {
        let reg = registry();
        let h = manual(&reg);
        reg.put("fabio/config", "a".to_string(), None).await.unwrap();

        let resp = h
            .handle(&request("POST", "/fabio/api/manual", r#"{"value":"b","version":0}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(reg.get("fabio/config").await.unwrap().unwrap().value, "a");
    }

    #[tokio::test]
    async fn test_bad_body_and_method() {
        let h = manual(&registry());
        let resp = h.handle(&request("PUT", "/fabio/api/manual", "not json")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = h.handle(&request("DELETE", "/fabio/api/manual", "")).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_paths_listing() {
        let reg = registry();
        for key in ["fabio/config", "fabio/config/canary", "unrelated"] {
            reg.put(key, String::new(), None).await.unwrap();
        }
        let h = ManualPathsHandler::new("fabio/config", Arc::clone(&reg));
        let resp = h.handle(&get("/fabio/api/paths")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let paths: Vec<String> = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(paths, vec!["", "/canary"]);
    }

    #[tokio::test]
    async fn test_paths_invalid_prefix() {
        let h = ManualPathsHandler::new("", registry());
        let resp = h.handle(&get("/fabio/api/paths")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    struct DownRegistry;

    #[async_trait]
    impl Registry for DownRegistry {
        async fn get(&self, _key: &str) -> Result<Option<KvEntry>, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }

        async fn put(
            &self,
            _key: &str,
            _value: String,
            _expected: Option<u64>,
        ) -> Result<u64, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }

        async fn list(&self, _prefix: &str) -> Result<Vec<String>, RegistryError> {
            Err(RegistryError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_registry_outage_is_bad_gateway() {
        let reg: Arc<dyn Registry> = Arc::new(DownRegistry);
        let resp = manual(&reg).handle(&get("/fabio/api/manual")).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = ManualPathsHandler::new("fabio/config", reg)
            .handle(&get("/fabio/api/paths"))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
