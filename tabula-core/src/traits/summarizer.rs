use crate::errors::TabulaResult;

/// External header summarizer (a language-model call in production).
///
/// May fail or time out; timeouts are the implementation's responsibility
/// and surface here as errors. The dispatcher makes a single call per
/// sheet with no internal retry.
#[async_trait::async_trait]
pub trait ISummarizer: Send + Sync {
    /// Describe a sheet's structure from a rendered content sample.
    async fn summarize(&self, sample: &str) -> TabulaResult<String>;
}
