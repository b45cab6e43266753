// Configuration module entry point
// Loads the admin server configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::AdminError;

// Re-export public types
pub use state::AppState;
pub use types::{
    AdminConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, RegistryConfig,
    RouteEntry, ServerConfig, ServerIdentity,
};

/// Environment variable prefix, e.g. `FABIO_ADMIN_ADMIN__ACCESS=ro`
const ENV_PREFIX: &str = "FABIO_ADMIN";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, AdminError> {
        let settings = Self::builder()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Configuration made of defaults only
    #[cfg(test)]
    pub fn defaults() -> Result<Self, AdminError> {
        Ok(Self::builder()?.build()?.try_deserialize()?)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, AdminError> {
        Ok(config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9998)?
            .set_default("admin.enabled", true)?
            .set_default("admin.access", "rw")?
            .set_default("admin.title", "")?
            .set_default("admin.color", "light-green")?
            .set_default("admin.commands", "")?
            .set_default("registry.kv_path", "/fabio/config")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "fabio-admin")?
            .set_default("http.max_body_size", 1_048_576)?) // 1MB
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, AdminError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| AdminError::InvalidAddress(format!("{e}")))
    }
}
