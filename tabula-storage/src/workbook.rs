//! Calamine-backed `ISheetReader` for `.xlsx`/`.xls` workbooks.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use tabula_core::errors::{SyncError, TabulaResult};
use tabula_core::models::{CellScalar, SheetData};
use tabula_core::traits::ISheetReader;

/// Reads workbooks with calamine. The first row of a sheet is taken as the
/// header row; empty header cells become positional `column_N` labels.
#[derive(Debug, Default)]
pub struct WorkbookSheetReader;

impl WorkbookSheetReader {
    pub fn new() -> Self {
        Self
    }
}

impl ISheetReader for WorkbookSheetReader {
    fn sheet_names(&self, path: &Path) -> TabulaResult<Vec<String>> {
        let workbook = open_workbook_auto(path).map_err(|e| SyncError::FileAccess {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(workbook.sheet_names().to_owned())
    }

    fn read_sheet(&self, path: &Path, sheet_name: &str) -> TabulaResult<SheetData> {
        let mut workbook = open_workbook_auto(path).map_err(|e| SyncError::FileAccess {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| SyncError::SheetParse {
                sheet: sheet_name.to_string(),
                reason: e.to_string(),
            })?;

        let mut rows_iter = range.rows();
        let columns = match rows_iter.next() {
            Some(header) => header_labels(header),
            None => Vec::new(),
        };
        let rows = rows_iter
            .map(|row| row.iter().map(cell_scalar).collect())
            .collect();

        Ok(SheetData {
            name: sheet_name.to_string(),
            columns,
            rows,
        })
    }
}

fn header_labels(header: &[Data]) -> Vec<String> {
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let label = match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            };
            let label = label.trim().to_string();
            if label.is_empty() {
                format!("column_{}", i + 1)
            } else {
                label
            }
        })
        .collect()
}

fn cell_scalar(cell: &Data) -> CellScalar {
    match cell {
        Data::Empty => CellScalar::Null,
        Data::Int(i) => CellScalar::Int(*i),
        Data::Float(f) => CellScalar::Float(*f),
        Data::Bool(b) => CellScalar::Bool(*b),
        Data::String(s) => CellScalar::Text(s.clone()),
        // Excel serial date number; the summary layer treats it as numeric.
        Data::DateTime(dt) => CellScalar::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellScalar::Text(s.clone()),
        // Cell-level errors (#DIV/0! etc.) carry no tabular value.
        Data::Error(_) => CellScalar::Null,
    }
}
