//! Logger module
//!
//! Named log helpers for the admin server, backed by `tracing`:
//! - Server lifecycle logging
//! - Access logging in several formats
//! - Error and warning logging

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::Config;
use crate::routing::RoutingTable;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// `RUST_LOG` overrides the configured level when set.
/// Should be called once at application startup.
pub fn init(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("Admin server started");
    tracing::info!("Listening on: http://{addr}");
    tracing::info!("Access mode: {}", config.admin.access);
    tracing::info!("Registry path: {}", config.registry.kv_path);
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!("======================================");
}

pub fn log_admin_disabled() {
    tracing::info!("Admin surface disabled, not starting server");
}

/// Dump the resolved routing table at debug level
pub fn log_route_table(table: &RoutingTable) {
    for binding in table.bindings() {
        tracing::debug!(
            pattern = %binding.pattern(),
            kind = ?binding.kind(),
            handler = binding.name(),
            "route bound"
        );
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Access-policy denials are expected outcomes, never anomalies
pub fn log_forbidden(path: &str) {
    tracing::debug!("access denied by policy: {path}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown() {
    tracing::info!("Shutdown requested, no longer accepting connections");
}

pub fn log_routes_reloaded(count: usize) {
    tracing::info!("Route snapshot reloaded: {count} routes");
}
