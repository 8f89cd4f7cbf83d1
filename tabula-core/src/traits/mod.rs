//! Contracts for the external collaborators the core delegates to.
//!
//! Everything behind these traits is a black box: spreadsheet parsing,
//! header summarization, SQL/answer generation, and the vector index. The
//! core consumes only the narrow surfaces defined here.

mod language_model;
mod sheet_reader;
mod summarizer;
mod vector_index;

pub use language_model::ILanguageModel;
pub use sheet_reader::ISheetReader;
pub use summarizer::ISummarizer;
pub use vector_index::IVectorIndex;
