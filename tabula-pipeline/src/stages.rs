//! One immutable result type per pipeline stage.
//!
//! Each stage consumes only the fields it needs from the previous stage's
//! result; nothing downstream mutates an earlier stage.

use tabula_core::models::{SchemaEntry, SheetCandidate, StatementResult};

/// Stage 1: deduplicated retrieval candidates, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedSheets {
    pub candidates: Vec<SheetCandidate>,
}

/// Stage 2: candidates kept after reranking. Reranking is skipped when two
/// or fewer candidates were retrieved.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSheets {
    pub candidates: Vec<SheetCandidate>,
}

/// Stage 3: resolved backing tables and their columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    pub entries: Vec<SchemaEntry>,
}

/// Stage 4: the generated statement batch, code fences stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSql {
    pub batch_text: String,
}

/// Stage 5: per-statement execution results in original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionReport {
    pub results: Vec<StatementResult>,
}

impl ExecutionReport {
    /// True when every statement produced no rows (error or empty set).
    pub fn is_empty(&self) -> bool {
        self.results.iter().all(|r| r.is_empty())
    }
}

/// Final outcome returned to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub question: String,
    pub answer: String,
    pub report: ExecutionReport,
}
