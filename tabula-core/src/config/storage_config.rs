use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Relational store and digest-registry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file holding the synced tables and mapping tables.
    pub db_path: PathBuf,
    /// JSON registry of file name → last synced digest.
    pub registry_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(defaults::DEFAULT_DB_PATH),
            registry_path: PathBuf::from(defaults::DEFAULT_REGISTRY_PATH),
        }
    }
}
