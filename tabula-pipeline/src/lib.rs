//! # tabula-pipeline
//!
//! The staged question-answering flow over the storage and analysis
//! layers: sync tables, keep the vector index fresh, and run
//! retrieve → rerank → generate → execute → compose for each question.
//!
//! All external services enter through the trait objects held by
//! [`PipelineContext`]; nothing here knows prompt text or index formats.

pub mod context;
pub mod flow;
pub mod stages;

pub use context::PipelineContext;
pub use flow::{strip_code_fences, NO_DATA_ANSWER};
pub use stages::{
    AnswerOutcome, ExecutionReport, GeneratedSql, RankedSheets, ResolvedSchema, RetrievedSheets,
};
