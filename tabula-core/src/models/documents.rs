//! The unit of embedding: one sheet's identity plus its header summary.

use serde::{Deserialize, Serialize};

/// A sheet description handed to the external vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDocument {
    pub source_file_name: String,
    pub sheet_name: String,
    pub header_summary: String,
    /// Human-readable sheet→header line, also used as rerank context.
    pub mapping_text: String,
}

impl SheetDocument {
    pub fn new(source_file_name: &str, sheet_name: &str, header_summary: &str) -> Self {
        Self {
            source_file_name: source_file_name.to_string(),
            sheet_name: sheet_name.to_string(),
            header_summary: header_summary.to_string(),
            mapping_text: format!("Sheet: {sheet_name}, headers: {header_summary}"),
        }
    }

    /// The text actually embedded: file identity prefixed onto the mapping
    /// line so same-named sheets from different files stay distinguishable.
    pub fn embedding_text(&self) -> String {
        format!("{}-{}", self.source_file_name, self.mapping_text)
    }
}
