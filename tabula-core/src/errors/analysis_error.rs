/// Analysis-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Per-sheet analysis failure. Excluded from the dispatcher's result
    /// map; sibling tasks are unaffected.
    #[error("analysis failed for sheet '{sheet}': {reason}")]
    TaskFailed { sheet: String, reason: String },

    /// Failure of an external collaborator call (summarizer, language
    /// model, reranker).
    #[error("external {service} call failed: {reason}")]
    ServiceCall { service: String, reason: String },
}
