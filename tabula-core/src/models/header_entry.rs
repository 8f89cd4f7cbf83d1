//! Cached header analysis for one sheet of one source file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One header-cache entry, keyed by `(source_file_name, sheet_name)`.
///
/// Valid only while `content_hash` equals the source file's current digest
/// and `schema_version` equals [`crate::constants::HEADER_SCHEMA_VERSION`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderCacheEntry {
    pub source_file_name: String,
    pub sheet_name: String,
    pub content_hash: String,
    pub schema_version: u32,
    pub header_summary: String,
    pub cached_at: DateTime<Utc>,
}

impl HeaderCacheEntry {
    /// The cache key for a `(file stem, sheet)` pair. Doubles as the
    /// persistent tier's file stem.
    pub fn cache_key(file_stem: &str, sheet_name: &str) -> String {
        format!("{file_stem}__{sheet_name}")
    }
}
