// Configuration types module
// Defines all configuration-related data structures

use serde::{Deserialize, Serialize};

use crate::error::AdminError;
use crate::routing::AccessMode;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub registry: RegistryConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Admin surface configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    /// When false no admin server is constructed at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Access mode string, `ro` or `rw`
    pub access: String,
    pub title: String,
    pub color: String,
    /// Help text shown on the manual editor page
    #[serde(default)]
    pub commands: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_enabled() -> bool {
    true
}

impl AdminConfig {
    /// Resolve the configured access mode
    ///
    /// A disabled surface wins over whatever access string is set.
    pub fn access_mode(&self) -> Result<AccessMode, AdminError> {
        if !self.enabled {
            return Ok(AccessMode::Disabled);
        }
        self.access.parse()
    }

    /// Build the display identity shared by the UI handlers
    pub fn identity(&self, version: &str) -> ServerIdentity {
        ServerIdentity {
            title: self.title.clone(),
            color: self.color.clone(),
            version: version.to_string(),
            commands: self.commands.clone(),
        }
    }
}

/// Display metadata threaded through to the UI handlers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerIdentity {
    pub title: String,
    pub color: String,
    pub version: String,
    pub commands: String,
}

/// Registry configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RegistryConfig {
    /// Key-value path holding the manual routing configuration
    pub kv_path: String,
    /// Static routes seeding the route snapshot
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

impl RegistryConfig {
    /// Key prefix used for registry lookups
    ///
    /// The configured path historically starts with a '/', but registry keys
    /// never do, so a single leading separator is dropped.
    pub fn paths_prefix(&self) -> &str {
        self.kv_path.strip_prefix('/').unwrap_or(&self.kv_path)
    }

    /// Reject paths whose prefix can never address a registry key
    pub fn validate(&self) -> Result<(), AdminError> {
        let prefix = self.paths_prefix();
        if prefix.is_empty() || prefix.split('/').any(|s| s.is_empty() || s == "..") {
            return Err(AdminError::InvalidRegistryPath(self.kv_path.clone()));
        }
        Ok(())
    }
}

/// One entry of the proxy routing table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RouteEntry {
    pub service: String,
    pub src: String,
    pub dst: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_weight() -> f64 {
    1.0
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub max_body_size: u64,
}
