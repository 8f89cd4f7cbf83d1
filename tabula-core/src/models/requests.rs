//! Requests handed to the external language-model collaborators, and the
//! candidate records returned by retrieval.
//!
//! Prompt text is owned by the collaborator implementations; the core only
//! assembles the structured inputs.

use serde::{Deserialize, Serialize};

use super::statement_result::StatementResult;

/// One retrieved sheet candidate, scored by the vector index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetCandidate {
    pub source_file_name: String,
    pub sheet_name: String,
    pub score: f64,
    pub mapping_text: String,
}

/// One resolved table presented to the SQL generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub table_name: String,
    pub source_file_name: String,
    pub sheet_name: String,
    pub columns: Vec<String>,
}

/// Input to `ILanguageModel::generate_sql`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlGenerationRequest {
    pub question: String,
    pub schema: Vec<SchemaEntry>,
}

/// Input to `ILanguageModel::compose_answer`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
    pub results: Vec<StatementResult>,
}
