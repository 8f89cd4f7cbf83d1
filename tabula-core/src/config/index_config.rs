use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Vector-index freshness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directory holding the external index artifacts and the snapshot file.
    pub index_dir: PathBuf,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            index_dir: PathBuf::from(defaults::DEFAULT_INDEX_DIR),
        }
    }
}
