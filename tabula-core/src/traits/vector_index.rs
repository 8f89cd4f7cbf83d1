use crate::errors::TabulaResult;
use crate::models::{SheetCandidate, SheetDocument};

/// External vector index and reranking service.
///
/// Similarity mathematics and persistence format are opaque to the core;
/// the freshness tracker only decides *whether* `rebuild` must run.
#[async_trait::async_trait]
pub trait IVectorIndex: Send + Sync {
    /// Replace the index contents with embeddings of the given documents.
    async fn rebuild(&self, documents: &[SheetDocument]) -> TabulaResult<()>;

    /// Top-k candidates for a query, best first.
    async fn search(&self, query: &str, k: usize) -> TabulaResult<Vec<SheetCandidate>>;

    /// Relevance scores for the candidates, parallel to the input slice.
    async fn rerank(&self, query: &str, candidates: &[SheetCandidate]) -> TabulaResult<Vec<f64>>;

    /// Whether a previously built index is available on disk.
    fn is_persisted(&self) -> bool;
}
