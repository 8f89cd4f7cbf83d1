//! The staged answer flow and the preparation passes.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, info, warn};

use tabula_core::errors::TabulaResult;
use tabula_core::models::{
    AnswerRequest, IndexSnapshot, SchemaEntry, SheetCandidate, SheetDocument,
    SheetTableMapping, SqlGenerationRequest,
};

use crate::context::PipelineContext;
use crate::stages::{
    AnswerOutcome, ExecutionReport, GeneratedSql, RankedSheets, ResolvedSchema, RetrievedSheets,
};

/// Retrieval depth at stage 1.
const RETRIEVAL_K: usize = 5;

/// Candidates kept after reranking.
const RERANK_KEEP: usize = 3;

/// Canned reply when every statement returned no rows.
pub const NO_DATA_ANSWER: &str = "No matching data was found for this question.";

impl PipelineContext {
    /// Bring every source file's tables up to date.
    pub fn ensure_tables(&self) -> TabulaResult<BTreeMap<String, Vec<SheetTableMapping>>> {
        self.engine.check_all(&self.config.source_dir)
    }

    /// Rebuild the vector index only when the source directory changed
    /// since the last build. Returns whether a rebuild ran.
    pub async fn ensure_index(&self) -> TabulaResult<bool> {
        let report = self.freshness.check(&self.config.source_dir)?;
        if !report.changed && self.vector_index.is_persisted() {
            info!("vector index is fresh, reusing persisted index");
            return Ok(false);
        }

        let mut documents = Vec::new();
        for file_name in report.current_files.keys() {
            let path = self.config.source_dir.join(file_name);
            let sheet_names = match self.reader.sheet_names(&path) {
                Ok(names) => names,
                Err(e) => {
                    warn!(file = %file_name, error = %e, "skipping unreadable file");
                    continue;
                }
            };
            let summaries = self.dispatcher.analyze_sheets(&path, &sheet_names).await;
            for (sheet_name, summary) in &summaries {
                documents.push(SheetDocument::new(file_name, sheet_name, summary));
            }
        }

        self.vector_index.rebuild(&documents).await?;
        // The snapshot is written only after the rebuild succeeded, so a
        // failed rebuild is retried on the next pass.
        self.freshness
            .save_snapshot(&IndexSnapshot::new(report.current_files))?;
        info!(documents = documents.len(), "vector index rebuilt");
        Ok(true)
    }

    /// Answer one natural-language question against the synced tables.
    pub async fn answer(&self, question: &str) -> TabulaResult<AnswerOutcome> {
        let retrieved = self.retrieve(question).await?;
        let ranked = self.rerank(question, retrieved).await?;
        let schema = self.resolve_schema(&ranked)?;
        let sql = self.generate_sql(question, &schema).await?;
        let report = self.execute(&sql)?;
        let answer = self.compose(question, &report).await?;
        Ok(AnswerOutcome {
            question: question.to_string(),
            answer,
            report,
        })
    }

    async fn retrieve(&self, question: &str) -> TabulaResult<RetrievedSheets> {
        let raw = self.vector_index.search(question, RETRIEVAL_K).await?;

        // Dedupe by (file, sheet), preserving rank order.
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for candidate in raw {
            let key = (
                candidate.source_file_name.clone(),
                candidate.sheet_name.clone(),
            );
            if seen.insert(key) {
                candidates.push(candidate);
            }
        }
        debug!(count = candidates.len(), "retrieval candidates");
        Ok(RetrievedSheets { candidates })
    }

    async fn rerank(
        &self,
        question: &str,
        retrieved: RetrievedSheets,
    ) -> TabulaResult<RankedSheets> {
        if retrieved.candidates.len() <= 2 {
            debug!("two or fewer candidates, skipping rerank");
            return Ok(RankedSheets {
                candidates: retrieved.candidates,
            });
        }

        let scores = self
            .vector_index
            .rerank(question, &retrieved.candidates)
            .await?;
        let mut scored: Vec<(SheetCandidate, f64)> =
            retrieved.candidates.into_iter().zip(scores).collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(RERANK_KEEP);
        Ok(RankedSheets {
            candidates: scored.into_iter().map(|(c, _)| c).collect(),
        })
    }

    fn resolve_schema(&self, ranked: &RankedSheets) -> TabulaResult<ResolvedSchema> {
        let mut entries = Vec::new();
        for candidate in &ranked.candidates {
            // Enhanced mapping first; the per-file mapping is the fallback.
            let table_name = match self
                .engine
                .table_for_sheet(&candidate.source_file_name, &candidate.sheet_name)?
            {
                Some(name) => Some(name),
                None => self
                    .engine
                    .mappings_for_file(&candidate.source_file_name)?
                    .into_iter()
                    .find(|m| m.sheet_name == candidate.sheet_name)
                    .map(|m| m.table_name),
            };
            let Some(table_name) = table_name else {
                warn!(
                    file = %candidate.source_file_name,
                    sheet = %candidate.sheet_name,
                    "no table mapped for candidate"
                );
                continue;
            };

            let columns = self.engine.table_columns(&table_name)?;
            entries.push(SchemaEntry {
                table_name,
                source_file_name: candidate.source_file_name.clone(),
                sheet_name: candidate.sheet_name.clone(),
                columns,
            });
        }
        Ok(ResolvedSchema { entries })
    }

    async fn generate_sql(
        &self,
        question: &str,
        schema: &ResolvedSchema,
    ) -> TabulaResult<GeneratedSql> {
        let request = SqlGenerationRequest {
            question: question.to_string(),
            schema: schema.entries.clone(),
        };
        let raw = self.language_model.generate_sql(&request).await?;
        Ok(GeneratedSql {
            batch_text: strip_code_fences(&raw).to_string(),
        })
    }

    fn execute(&self, sql: &GeneratedSql) -> TabulaResult<ExecutionReport> {
        let results = self.engine.execute_batch(&sql.batch_text)?;
        Ok(ExecutionReport { results })
    }

    async fn compose(&self, question: &str, report: &ExecutionReport) -> TabulaResult<String> {
        if report.is_empty() {
            debug!("all statements returned no rows, composing canned answer");
            return Ok(NO_DATA_ANSWER.to_string());
        }
        let request = AnswerRequest {
            question: question.to_string(),
            results: report.results.clone(),
        };
        self.language_model.compose_answer(&request).await
    }
}

/// Strip a leading/trailing markdown code fence from a model reply.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix("```sql")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix("```").unwrap_or(trimmed);
    trimmed.trim()
}
