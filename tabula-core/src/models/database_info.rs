//! Storage statistics surfaced for diagnostics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub database_path: String,
    pub database_size_bytes: u64,
    /// Files currently marked active in `file_versions`.
    pub active_files: usize,
    /// Rows in `table_mappings`.
    pub total_tables: usize,
    /// Entries in the file-digest registry.
    pub registry_entries: usize,
}
