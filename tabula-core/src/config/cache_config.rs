use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Header-cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory of persistent entries, one JSON file per file+sheet key.
    pub cache_dir: PathBuf,
    /// Memory-tier capacity; insertion beyond it evicts the entry with the
    /// oldest `cached_at`.
    pub max_memory_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(defaults::DEFAULT_CACHE_DIR),
            max_memory_entries: defaults::DEFAULT_MAX_MEMORY_ENTRIES,
        }
    }
}
