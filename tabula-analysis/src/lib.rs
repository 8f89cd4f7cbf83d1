//! # tabula-analysis
//!
//! Header analysis layer: the two-tier header cache, the bounded analysis
//! dispatcher, sheet sampling, and vector-index freshness tracking.
//! Depends downward on tabula-core only.

pub mod cache;
pub mod dispatcher;
pub mod freshness;
pub mod sampler;

pub use cache::{CacheStats, HeaderCache};
pub use dispatcher::AnalysisDispatcher;
pub use freshness::{FreshnessReport, FreshnessTracker};
