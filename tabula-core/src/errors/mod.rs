//! Error taxonomy for the Tabula workspace.
//!
//! Failures local to one unit of work (a sheet, a statement, an analysis
//! task) are absorbed by their components and reported structurally; the
//! types here carry the failures that must propagate.

mod analysis_error;
mod cache_error;
mod config_error;
mod index_error;
mod storage_error;
mod sync_error;

pub use analysis_error::AnalysisError;
pub use cache_error::CacheError;
pub use config_error::ConfigError;
pub use index_error::IndexError;
pub use storage_error::StorageError;
pub use sync_error::SyncError;

/// Umbrella error for all Tabula subsystems.
#[derive(Debug, thiserror::Error)]
pub enum TabulaError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used across the workspace.
pub type TabulaResult<T> = Result<T, TabulaError>;
