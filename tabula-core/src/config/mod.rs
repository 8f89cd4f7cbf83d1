//! Configuration for every subsystem, loadable from TOML.
//!
//! Constructed once at process start and passed by reference into each
//! component; there are no lazily-initialized global managers.

mod analysis_config;
mod cache_config;
mod index_config;
mod storage_config;

pub use analysis_config::AnalysisConfig;
pub use cache_config::CacheConfig;
pub use index_config::IndexConfig;
pub use storage_config::StorageConfig;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, TabulaResult};

/// Default values shared by the config structs.
pub mod defaults {
    /// Directory scanned for spreadsheet source files.
    pub const DEFAULT_SOURCE_DIR: &str = "uploads";
    /// SQLite database file backing the synced tables.
    pub const DEFAULT_DB_PATH: &str = "tabula.db";
    /// JSON file recording each source file's last synced digest.
    pub const DEFAULT_REGISTRY_PATH: &str = "file_registry.json";
    /// Directory of persistent header-cache entries.
    pub const DEFAULT_CACHE_DIR: &str = "cache/headers";
    /// Memory-tier capacity of the header cache.
    pub const DEFAULT_MAX_MEMORY_ENTRIES: usize = 100;
    /// Concurrent in-flight summarizer calls.
    pub const DEFAULT_CONCURRENCY_LIMIT: usize = 3;
    /// Data rows rendered into one sheet sample.
    pub const DEFAULT_SAMPLE_ROW_LIMIT: usize = 20;
    /// Directory holding the vector index and its snapshot.
    pub const DEFAULT_INDEX_DIR: &str = "index";
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TabulaConfig {
    /// Directory scanned for source files.
    pub source_dir: PathBuf,
    pub storage: StorageConfig,
    pub cache: CacheConfig,
    pub analysis: AnalysisConfig,
    pub index: IndexConfig,
}

impl Default for TabulaConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(defaults::DEFAULT_SOURCE_DIR),
            storage: StorageConfig::default(),
            cache: CacheConfig::default(),
            analysis: AnalysisConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl TabulaConfig {
    /// Load configuration from a TOML file. Missing keys fall back to the
    /// defaults above.
    pub fn from_toml_file(path: &Path) -> TabulaResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_named_constants() {
        let config = TabulaConfig::default();
        assert_eq!(config.source_dir, PathBuf::from("uploads"));
        assert_eq!(config.cache.max_memory_entries, 100);
        assert_eq!(config.analysis.concurrency_limit, 3);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tabula.toml");
        std::fs::write(
            &path,
            "source_dir = \"sheets\"\n\n[analysis]\nconcurrency_limit = 8\n",
        )
        .unwrap();

        let config = TabulaConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.source_dir, PathBuf::from("sheets"));
        assert_eq!(config.analysis.concurrency_limit, 8);
        // Untouched sections keep their defaults.
        assert_eq!(config.cache.max_memory_entries, 100);
        assert_eq!(config.storage.db_path, PathBuf::from("tabula.db"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "source_dir = [not toml").unwrap();
        let err = TabulaConfig::from_toml_file(&path).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::TabulaError::Config(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err =
            TabulaConfig::from_toml_file(Path::new("/nonexistent/tabula.toml")).unwrap_err();
        assert!(matches!(
            err,
            crate::errors::TabulaError::Config(ConfigError::Read { .. })
        ));
    }
}
