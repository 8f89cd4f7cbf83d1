//! Data model types shared across the workspace.

mod database_info;
mod documents;
mod header_entry;
mod index_snapshot;
mod mapping;
mod requests;
mod sheet;
mod source_file;
mod statement_result;

pub use database_info::DatabaseInfo;
pub use documents::SheetDocument;
pub use header_entry::HeaderCacheEntry;
pub use index_snapshot::IndexSnapshot;
pub use mapping::{EnhancedMapping, SheetTableMapping};
pub use requests::{AnswerRequest, SchemaEntry, SheetCandidate, SqlGenerationRequest};
pub use sheet::{CellScalar, SheetData};
pub use source_file::SourceFile;
pub use statement_result::StatementResult;
