//! Admin server assembly
//!
//! Wires the default collaborators (registry, route snapshot, renderers,
//! embedded assets) into a `HandlerSet` and resolves the routing table for
//! the configured access mode.

use std::sync::Arc;

use crate::api::{
    ConfigHandler, ManualHandler, ManualPathsHandler, Registry, RouteSnapshot, RoutesHandler,
    VersionHandler,
};
use crate::config::Config;
use crate::error::AdminError;
use crate::handler::assets::{AssetHandler, EmbeddedAssets};
use crate::handler::HealthHandler;
use crate::routing::{
    build_routing_table, AccessMode, HandlerSet, RoutingTable, API_MANUAL_PATH, ASSETS_PREFIX,
};
use crate::ui::{ManualUiHandler, RoutesUiHandler};

/// Root of the UI files inside the embedded asset tree
pub const ASSET_ROOT: &str = "assets";

/// External collaborators the admin surface renders or edits
#[derive(Clone)]
pub struct Collaborators {
    pub registry: Arc<dyn Registry>,
    pub snapshot: RouteSnapshot,
}

/// Build the handler capabilities for a configuration
///
/// Editing handlers are only constructed when the mode can reach them.
pub fn standard_handlers(
    config: &Config,
    mode: AccessMode,
    version: &str,
    collaborators: &Collaborators,
) -> HandlerSet {
    let identity = Arc::new(config.admin.identity(version));
    let prefix = config.registry.paths_prefix();

    let mut handlers = HandlerSet {
        config: Some(Arc::new(ConfigHandler::new(config.clone()))),
        routes: Some(Arc::new(RoutesHandler::new(collaborators.snapshot.clone()))),
        version: Some(Arc::new(VersionHandler::new(version))),
        routes_ui: Some(Arc::new(RoutesUiHandler::new(
            Arc::clone(&identity),
            collaborators.snapshot.clone(),
        ))),
        health: Some(Arc::new(HealthHandler)),
        assets: Some(Arc::new(AssetHandler::new(
            ASSETS_PREFIX,
            EmbeddedAssets::new(),
            ASSET_ROOT,
        ))),
        ..HandlerSet::default()
    };

    if mode == AccessMode::ReadWrite {
        let registry = &collaborators.registry;
        handlers.paths = Some(Arc::new(ManualPathsHandler::new(prefix, Arc::clone(registry))));
        handlers.manual_api = Some(Arc::new(ManualHandler::new(
            API_MANUAL_PATH,
            prefix,
            Arc::clone(registry),
        )));
        handlers.manual_ui = Some(Arc::new(ManualUiHandler::new(
            identity,
            prefix,
            Arc::clone(registry),
        )));
    }

    handlers
}

/// Resolve the access mode and build the routing table in one step
pub fn build_admin_table(
    config: &Config,
    version: &str,
    collaborators: &Collaborators,
) -> Result<RoutingTable, AdminError> {
    let mode = config.admin.access_mode()?;
    config.registry.validate()?;
    let handlers = standard_handlers(config, mode, version, collaborators);
    build_routing_table(mode, &handlers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryRegistry;
    use crate::config::RouteEntry;
    use crate::handler::test_support::*;
    use hyper::StatusCode;

    fn collaborators() -> Collaborators {
        Collaborators {
            registry: Arc::new(MemoryRegistry::new()),
            snapshot: RouteSnapshot::new(vec![RouteEntry {
                service: "web".to_string(),
                src: "/".to_string(),
                dst: "http://web:8080/".to_string(),
                weight: 1.0,
                tags: Vec::new(),
            }]),
        }
    }

    fn config(access: &str) -> Config {
        let mut cfg = Config::defaults().unwrap();
        cfg.admin.access = access.to_string();
        cfg
    }

    #[tokio::test]
    async fn test_admin_server_access() {
        let cases: [(&str, [(&str, u16); 11]); 2] = [
            (
                "ro",
                [
                    ("/fabio/api/manual", 403),
                    ("/fabio/api/paths", 403),
                    ("/fabio/api/config", 200),
                    ("/fabio/api/routes", 200),
                    ("/fabio/api/version", 200),
                    ("/fabio/manual", 403),
                    ("/fabio/routes", 200),
                    ("/health", 200),
                    ("/fabio/assets/logo.svg", 200),
                    ("/fabio/assets/logo.bw.svg", 200),
                    ("/fabio/", 303),
                ],
            ),
            (
                "rw",
                [
                    ("/fabio/api/manual", 200),
                    ("/fabio/api/paths", 200),
                    ("/fabio/api/config", 200),
                    ("/fabio/api/routes", 200),
                    ("/fabio/api/version", 200),
                    ("/fabio/manual", 200),
                    ("/fabio/routes", 200),
                    ("/health", 200),
                    ("/fabio/assets/logo.svg", 200),
                    ("/fabio/assets/logo.bw.svg", 200),
                    ("/fabio/", 303),
                ],
            ),
        ];

        for (access, tests) in cases {
            let table = build_admin_table(&config(access), "1.0.0", &collaborators()).unwrap();
            for (uri, code) in tests {
                let resp = table.dispatch(&get(uri)).await;
                assert_eq!(resp.status().as_u16(), code, "{access}{uri}");
            }
        }
    }

    #[tokio::test]
    async fn test_subtree_paths_without_slash_redirect() {
        for access in ["ro", "rw"] {
            let table = build_admin_table(&config(access), "1.0.0", &collaborators()).unwrap();
            for (uri, location) in [
                ("/fabio", "/fabio/"),
                ("/fabio/assets", "/fabio/assets/"),
                ("/fabio/assets?v=2", "/fabio/assets/?v=2"),
            ] {
                let resp = table.dispatch(&get(uri)).await;
                assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY, "{access}{uri}");
                assert_eq!(resp.headers()["Location"], location, "{access}{uri}");
            }
        }
    }

    #[tokio::test]
    async fn test_encoded_asset_path_is_served() {
        let table = build_admin_table(&config("ro"), "1.0.0", &collaborators()).unwrap();
        let resp = table.dispatch(&get("/fabio/assets/logo%2Esvg")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "image/svg+xml");
    }

    #[tokio::test]
    async fn test_encoded_editing_path_stays_forbidden() {
        let table = build_admin_table(&config("ro"), "1.0.0", &collaborators()).unwrap();
        let resp = table.dispatch(&get("/fabio/api/m%61nual")).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_manual_round_trip_in_read_write() {
        let collab = collaborators();
        let table = build_admin_table(&config("rw"), "1.0.0", &collab).unwrap();

        let resp = table
            .dispatch(&request("PUT", "/fabio/api/manual", r#"{"value":"route del web"}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Stored under the prefix without its leading slash
        let stored = collab.registry.get("fabio/config").await.unwrap().unwrap();
        assert_eq!(stored.value, "route del web");

        let resp = table.dispatch(&get("/fabio/api/paths")).await;
        assert_eq!(body_string(resp).await.split_whitespace().collect::<String>(), "[\"\"]");
    }

    #[tokio::test]
    async fn test_read_only_never_touches_registry() {
        let collab = collaborators();
        let table = build_admin_table(&config("ro"), "1.0.0", &collab).unwrap();
        let resp = table
            .dispatch(&request("PUT", "/fabio/api/manual", r#"{"value":"x"}"#))
            .await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(collab.registry.list("fabio/config").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_version_endpoint_uses_supplied_version() {
        let table = build_admin_table(&config("ro"), "9.9.9", &collaborators()).unwrap();
        let resp = table.dispatch(&get("/fabio/api/version")).await;
        assert_eq!(body_string(resp).await, "9.9.9");
    }

    #[test]
    fn test_invalid_access_is_fatal() {
        assert!(matches!(
            build_admin_table(&config("admin"), "1.0.0", &collaborators()),
            Err(AdminError::InvalidAccessMode(_))
        ));
    }

    #[test]
    fn test_root_registry_path_is_fatal() {
        for access in ["ro", "rw"] {
            let mut cfg = config(access);
            cfg.registry.kv_path = "/".to_string();
            assert!(matches!(
                build_admin_table(&cfg, "1.0.0", &collaborators()),
                Err(AdminError::InvalidRegistryPath(p)) if p == "/"
            ));
        }
    }

    #[test]
    fn test_disabled_is_fatal_for_construction() {
        let mut cfg = config("rw");
        cfg.admin.enabled = false;
        assert!(matches!(
            build_admin_table(&cfg, "1.0.0", &collaborators()),
            Err(AdminError::Disabled)
        ));
    }
}
