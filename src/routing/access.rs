//! Access policy module
//!
//! Turns an access mode and a set of handler capabilities into the admin
//! routing table. The mode is applied here, once: in read-only mode the
//! config editing paths are bound to the forbidden handler, so no request
//! can ever reach the real editors.

use hyper::StatusCode;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::table::{RoutingTable, RoutingTableBuilder};
use crate::error::AdminError;
use crate::handler::{ForbiddenHandler, NotFoundHandler, RedirectHandler, SharedHandler};

pub const HEALTH_PATH: &str = "/health";
pub const API_CONFIG_PATH: &str = "/fabio/api/config";
pub const API_ROUTES_PATH: &str = "/fabio/api/routes";
pub const API_VERSION_PATH: &str = "/fabio/api/version";
pub const API_PATHS_PATH: &str = "/fabio/api/paths";
pub const API_MANUAL_PATH: &str = "/fabio/api/manual";
pub const UI_MANUAL_PATH: &str = "/fabio/manual";
pub const UI_ROUTES_PATH: &str = "/fabio/routes";
pub const ASSETS_PREFIX: &str = "/fabio/assets/";
pub const FAVICON_PATH: &str = "/fabio/favicon.ico";
pub const ADMIN_ROOT: &str = "/fabio/";

/// Who may use the configuration editing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadOnly,
    ReadWrite,
    /// No admin server is constructed
    Disabled,
}

impl FromStr for AccessMode {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ro" => Ok(Self::ReadOnly),
            "rw" => Ok(Self::ReadWrite),
            other => Err(AdminError::InvalidAccessMode(other.to_string())),
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "ro"),
            Self::ReadWrite => write!(f, "rw"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Handler capabilities supplied by the surrounding runtime
///
/// The editing handlers are only required in read-write mode.
#[derive(Default, Clone)]
pub struct HandlerSet {
    pub config: Option<SharedHandler>,
    pub routes: Option<SharedHandler>,
    pub version: Option<SharedHandler>,
    pub routes_ui: Option<SharedHandler>,
    pub health: Option<SharedHandler>,
    pub assets: Option<SharedHandler>,
    pub paths: Option<SharedHandler>,
    pub manual_api: Option<SharedHandler>,
    pub manual_ui: Option<SharedHandler>,
}

fn require(handler: Option<&SharedHandler>, name: &'static str) -> Result<SharedHandler, AdminError> {
    handler.cloned().ok_or(AdminError::MissingHandler(name))
}

/// Build the admin routing table for an access mode
///
/// | path                          | ro        | rw        |
/// |-------------------------------|-----------|-----------|
/// | paths, manual API, manual UI  | 403       | handler   |
/// | config, routes, version, UI   | handler   | handler   |
/// | health                        | handler   | handler   |
/// | assets subtree                | handler   | handler   |
/// | favicon                       | 404       | 404       |
/// | admin root subtree            | 303       | 303       |
pub fn build_routing_table(
    mode: AccessMode,
    handlers: &HandlerSet,
) -> Result<RoutingTable, AdminError> {
    let mut builder = RoutingTableBuilder::new();

    match mode {
        AccessMode::ReadOnly => {
            let forbidden: SharedHandler = Arc::new(ForbiddenHandler);
            for pattern in editing_patterns() {
                builder = builder.bind(&pattern, "forbidden", Arc::clone(&forbidden))?;
            }
        }
        AccessMode::ReadWrite => {
            let paths = require(handlers.paths.as_ref(), "paths")?;
            let manual_api = require(handlers.manual_api.as_ref(), "manual_api")?;
            let manual_ui = require(handlers.manual_ui.as_ref(), "manual_ui")?;
            builder = builder
                .bind(API_PATHS_PATH, "paths", paths)?
                .bind(API_MANUAL_PATH, "manual_api", Arc::clone(&manual_api))?
                .bind(&format!("{API_MANUAL_PATH}/"), "manual_api", manual_api)?
                .bind(UI_MANUAL_PATH, "manual_ui", Arc::clone(&manual_ui))?
                .bind(&format!("{UI_MANUAL_PATH}/"), "manual_ui", manual_ui)?;
        }
        AccessMode::Disabled => return Err(AdminError::Disabled),
    }

    let table = builder
        .bind(API_CONFIG_PATH, "config", require(handlers.config.as_ref(), "config")?)?
        .bind(API_ROUTES_PATH, "routes", require(handlers.routes.as_ref(), "routes")?)?
        .bind(API_VERSION_PATH, "version", require(handlers.version.as_ref(), "version")?)?
        .bind(UI_ROUTES_PATH, "routes_ui", require(handlers.routes_ui.as_ref(), "routes_ui")?)?
        .bind(HEALTH_PATH, "health", require(handlers.health.as_ref(), "health")?)?
        .bind(ASSETS_PREFIX, "assets", require(handlers.assets.as_ref(), "assets")?)?
        .bind(FAVICON_PATH, "not_found", Arc::new(NotFoundHandler))?
        .bind(
            ADMIN_ROOT,
            "redirect",
            Arc::new(RedirectHandler::new(UI_ROUTES_PATH, StatusCode::SEE_OTHER)),
        )?
        .build();

    Ok(table)
}

/// Paths that mutate or reveal editable configuration
fn editing_patterns() -> [String; 5] {
    [
        API_PATHS_PATH.to_string(),
        API_MANUAL_PATH.to_string(),
        format!("{API_MANUAL_PATH}/"),
        UI_MANUAL_PATH.to_string(),
        format!("{UI_MANUAL_PATH}/"),
    ]
}
