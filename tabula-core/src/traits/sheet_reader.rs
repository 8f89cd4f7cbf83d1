use std::path::Path;

use crate::errors::TabulaResult;
use crate::models::SheetData;

/// External spreadsheet parser.
///
/// Enumeration and per-sheet reads are separate operations so one
/// malformed sheet cannot poison the rest of the file: the sync loop reads
/// sheet by sheet and isolates each failure.
pub trait ISheetReader: Send + Sync {
    /// The sheet names of a source file, in workbook order.
    fn sheet_names(&self, path: &Path) -> TabulaResult<Vec<String>>;

    /// Parse one sheet into header columns and data rows.
    fn read_sheet(&self, path: &Path, sheet_name: &str) -> TabulaResult<SheetData>;
}
