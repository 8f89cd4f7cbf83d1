//! Parsed sheet content handed from the spreadsheet reader to table creation.

use serde::{Deserialize, Serialize};

/// A single cell value, already normalized out of the source format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellScalar {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl CellScalar {
    pub fn is_null(&self) -> bool {
        matches!(self, CellScalar::Null)
    }
}

/// One parsed sheet: the column labels taken from the header row, and the
/// data rows below it. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellScalar>>,
}

impl SheetData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}
