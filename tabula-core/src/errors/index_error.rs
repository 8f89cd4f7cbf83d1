/// Vector-index freshness and snapshot errors.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to read index snapshot {path}: {reason}")]
    SnapshotRead { path: String, reason: String },

    #[error("failed to write index snapshot {path}: {reason}")]
    SnapshotWrite { path: String, reason: String },

    #[error("vector index rebuild failed: {reason}")]
    RebuildFailed { reason: String },
}
