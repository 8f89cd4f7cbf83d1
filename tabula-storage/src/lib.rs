//! # tabula-storage
//!
//! SQLite persistence layer: connection pool, migrations, the incremental
//! sync engine, mapping queries, and the statement batch executor.
//!
//! This crate is the pure data-access layer; it has no dependency on the
//! analysis or language-model layers above it.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod registry;
pub mod workbook;

pub use engine::{SyncEngine, SyncOutcome};
pub use workbook::WorkbookSheetReader;

use tabula_core::errors::{StorageError, TabulaError};

/// Shorthand used throughout this crate to wrap rusqlite errors.
pub fn to_storage_err(message: String) -> TabulaError {
    TabulaError::Storage(StorageError::SqliteError { message })
}
