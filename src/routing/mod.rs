//! Routing module
//!
//! Provides the admin routing layer:
//! - Path table with exact and subtree bindings
//! - Access-mode policy applied when the table is built

mod access;
mod table;

pub use access::{build_routing_table, AccessMode, HandlerSet};
pub use access::{
    ADMIN_ROOT, API_CONFIG_PATH, API_MANUAL_PATH, API_PATHS_PATH, API_ROUTES_PATH,
    API_VERSION_PATH, ASSETS_PREFIX, FAVICON_PATH, HEALTH_PATH, UI_MANUAL_PATH, UI_ROUTES_PATH,
};
pub use table::{MatchKind, RouteBinding, RoutingTable, RoutingTableBuilder};
