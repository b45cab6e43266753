// Registry module
// Key-value store holding the manual routing configuration

use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::error::RegistryError;

/// A stored value together with its modification index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KvEntry {
    pub value: String,
    pub version: u64,
}

/// Key-value backend for manual configuration
#[async_trait]
pub trait Registry: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, RegistryError>;

    /// Store `value` under `key` and return the new version
    ///
    /// With `expected` set the write only succeeds if the stored version
    /// still matches (0 means "must not exist yet").
    async fn put(&self, key: &str, value: String, expected: Option<u64>)
        -> Result<u64, RegistryError>;

    /// All keys equal to `prefix` or below `prefix/`, sorted
    async fn list(&self, prefix: &str) -> Result<Vec<String>, RegistryError>;
}

/// In-process registry
#[derive(Default)]
pub struct MemoryRegistry {
    entries: RwLock<BTreeMap<String, KvEntry>>,
    index: RwLock<u64>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

fn validate_key(key: &str) -> Result<(), RegistryError> {
    if key.is_empty() || key.starts_with('/') || key.split('/').any(|s| s == "..") {
        return Err(RegistryError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn get(&self, key: &str) -> Result<Option<KvEntry>, RegistryError> {
        validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(
        &self,
        key: &str,
        value: String,
        expected: Option<u64>,
    ) -> Result<u64, RegistryError> {
        validate_key(key)?;
        let mut entries = self.entries.write().await;
        let actual = entries.get(key).map_or(0, |e| e.version);
        if let Some(expected) = expected {
            if expected != actual {
                return Err(RegistryError::VersionMismatch {
                    key: key.to_string(),
                    expected,
                    actual,
                });
            }
        }

        let mut index = self.index.write().await;
        *index += 1;
        entries.insert(
            key.to_string(),
            KvEntry {
                value,
                version: *index,
            },
        );
        Ok(*index)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, RegistryError> {
        validate_key(prefix)?;
        let subtree = format!("{prefix}/");
        let entries = self.entries.read().await;
        Ok(entries
            .keys()
            .filter(|k| *k == prefix || k.starts_with(&subtree))
            .cloned()
            .collect())
    }
}
