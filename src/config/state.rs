// Application state module
// Shared, read-mostly state handed to every connection task

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use super::types::Config;
use crate::logger::{self, AccessLogFormat};
use crate::routing::RoutingTable;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Built once at startup, never mutated afterwards
    pub table: Arc<RoutingTable>,
    pub active_connections: AtomicUsize,
    pub shutdown: Arc<Notify>,

    // Cached config values for fast access without locks
    pub cached_access_log: AtomicBool,
    pub access_log_format: AccessLogFormat,
}

impl AppState {
    pub fn new(config: Config, table: RoutingTable) -> Self {
        let access_log = config.logging.access_log;
        let access_log_format = config
            .logging
            .access_log_format
            .parse()
            .unwrap_or_else(|e: String| {
                logger::log_warning(&format!("{e}, falling back to combined"));
                AccessLogFormat::default()
            });
        Self {
            config,
            table: Arc::new(table),
            active_connections: AtomicUsize::new(0),
            shutdown: Arc::new(Notify::new()),
            cached_access_log: AtomicBool::new(access_log),
            access_log_format,
        }
    }

    pub fn access_log_enabled(&self) -> bool {
        self.cached_access_log.load(Ordering::Relaxed)
    }
}
