//! Error types
//!
//! Startup failures are fatal and surface as `AdminError`. Per-request
//! outcomes (403, 404, collaborator errors) never become errors here; they are
//! plain HTTP responses.

use thiserror::Error;

/// Errors raised while configuring or constructing the admin server
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid access mode '{0}', expected 'ro' or 'rw'")]
    InvalidAccessMode(String),

    #[error("admin surface is disabled")]
    Disabled,

    #[error("missing handler for '{0}'")]
    MissingHandler(&'static str),

    #[error("duplicate route pattern '{0}'")]
    DuplicatePattern(String),

    #[error("invalid route pattern '{0}', must start with '/'")]
    InvalidPattern(String),

    #[error("invalid registry path '{0}', expected a non-root key path such as '/fabio/config'")]
    InvalidRegistryPath(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by a registry backend
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid key '{0}'")]
    InvalidKey(String),

    #[error("version mismatch for '{key}': expected {expected}, found {actual}")]
    VersionMismatch {
        key: String,
        expected: u64,
        actual: u64,
    },

    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
