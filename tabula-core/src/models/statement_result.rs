//! Per-statement execution report for a statement batch.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The outcome of one statement of a batch. Produced fresh per query,
/// never persisted.
///
/// `columns` is the order authority for the row maps; SQL NULL is carried
/// as an explicit JSON null, distinguished from key absence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementResult {
    /// 0-based position of the statement in the original batch.
    pub index: usize,
    pub statement_text: String,
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
    pub error: Option<String>,
}

impl StatementResult {
    pub fn success(
        index: usize,
        statement_text: String,
        columns: Vec<String>,
        rows: Vec<Map<String, Value>>,
    ) -> Self {
        Self {
            index,
            statement_text,
            columns,
            rows,
            error: None,
        }
    }

    pub fn failure(index: usize, statement_text: String, error: String) -> Self {
        Self {
            index,
            statement_text,
            columns: Vec::new(),
            rows: Vec::new(),
            error: Some(error),
        }
    }

    /// Whether the statement produced no rows (either an error or an empty
    /// result set).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_has_empty_columns_and_rows() {
        let result = StatementResult::failure(1, "SELECT * FROM missing".to_string(), "no such table".to_string());
        assert!(result.columns.is_empty());
        assert!(result.rows.is_empty());
        assert!(result.is_empty());
        assert_eq!(result.error.as_deref(), Some("no such table"));
    }

    #[test]
    fn null_cell_is_preserved_not_absent() {
        let mut row = Map::new();
        row.insert("qty".to_string(), Value::Null);
        let result = StatementResult::success(0, "SELECT qty".to_string(), vec!["qty".to_string()], vec![row]);
        assert_eq!(result.rows[0].get("qty"), Some(&Value::Null));
        assert!(!result.is_empty());
    }
}
