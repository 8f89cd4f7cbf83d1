//! # tabula-core
//!
//! Foundation crate for the Tabula spreadsheet question-answering system.
//! Defines all types, models, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod hashing;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::TabulaConfig;
pub use errors::{TabulaError, TabulaResult};
pub use models::{
    CellScalar, EnhancedMapping, HeaderCacheEntry, SheetData, SheetDocument, SheetTableMapping,
    StatementResult,
};
