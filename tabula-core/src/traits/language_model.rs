use crate::errors::TabulaResult;
use crate::models::{AnswerRequest, SqlGenerationRequest};

/// External language model used at query time.
///
/// The core hands over structured requests and consumes opaque text back;
/// prompt wording lives entirely in the implementation.
#[async_trait::async_trait]
pub trait ILanguageModel: Send + Sync {
    /// Generate a statement batch for the question against the given schema.
    async fn generate_sql(&self, request: &SqlGenerationRequest) -> TabulaResult<String>;

    /// Compose a natural-language answer from the execution results.
    async fn compose_answer(&self, request: &AnswerRequest) -> TabulaResult<String>;
}
