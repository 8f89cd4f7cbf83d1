//! Sheet-to-table mappings and deterministic table naming.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::TABLE_NAME_PREFIX;

/// Maps one sheet of a source file to its backing table.
/// Unique on `(source_file_name, sheet_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetTableMapping {
    pub source_file_name: String,
    pub sheet_name: String,
    pub table_name: String,
    pub created_at: DateTime<Utc>,
}

impl SheetTableMapping {
    /// Generate the backing table name for a `(base_name, sheet_name)` pair.
    ///
    /// Pure and deterministic: the same inputs always yield the same name,
    /// across resyncs and process restarts, so cached headers and generated
    /// SQL stay valid. Unicode alphanumerics are retained, everything else
    /// is dropped.
    pub fn table_name_for(base_name: &str, sheet_name: &str) -> String {
        format!(
            "{}_{}_{}",
            TABLE_NAME_PREFIX,
            sanitize_identifier(base_name),
            sanitize_identifier(sheet_name)
        )
    }
}

/// Secondary mapping index carrying the originating file path, so a sheet
/// name shared by several files can be disambiguated.
/// Unique on `(source_file_name, sheet_name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhancedMapping {
    pub source_file_name: String,
    pub sheet_name: String,
    pub table_name: String,
    pub file_path: String,
}

fn sanitize_identifier(raw: &str) -> String {
    raw.chars().filter(|c| c.is_alphanumeric()).collect()
}
