/// Synchronization errors for source files and the digest registry.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Unreadable source file. Fatal for that file's sync, non-fatal for a
    /// directory batch.
    #[error("cannot access source file {path}: {reason}")]
    FileAccess { path: String, reason: String },

    /// Per-sheet parse failure. Isolated: the sync loop skips the sheet and
    /// continues.
    #[error("failed to parse sheet '{sheet}': {reason}")]
    SheetParse { sheet: String, reason: String },

    /// Digest-registry persistence failure. Must surface: silent failure
    /// here leaves the registry and the database permanently divergent.
    #[error("failed to persist file registry {path}: {reason}")]
    RegistryWrite { path: String, reason: String },
}
