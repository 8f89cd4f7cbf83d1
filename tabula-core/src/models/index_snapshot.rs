//! Persisted record of what the vector index was last built from.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The per-file content digests the vector index was built against, plus
/// the build time. Persisted as JSON beside the index; compared on startup
/// to decide whether the external embedding pipeline must run again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub last_update: DateTime<Utc>,
    /// file name → content digest at build time.
    pub files: BTreeMap<String, String>,
}

impl IndexSnapshot {
    pub fn new(files: BTreeMap<String, String>) -> Self {
        Self {
            last_update: Utc::now(),
            files,
        }
    }
}
