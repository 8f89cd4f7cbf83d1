/// Header-cache errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Malformed persistent entry. The cache evicts it and treats the
    /// lookup as a miss; the variant exists so the eviction can be logged
    /// with a cause.
    #[error("corrupt cache entry for {key}: {reason}")]
    Corruption { key: String, reason: String },

    #[error("cache I/O failure at {path}: {reason}")]
    Io { path: String, reason: String },
}
