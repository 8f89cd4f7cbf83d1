use serde::{Deserialize, Serialize};

use super::defaults;

/// Header-analysis dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum simultaneously in-flight summarizer calls.
    pub concurrency_limit: usize,
    /// Data rows rendered into the content sample sent to the summarizer.
    pub sample_row_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency_limit: defaults::DEFAULT_CONCURRENCY_LIMIT,
            sample_row_limit: defaults::DEFAULT_SAMPLE_ROW_LIMIT,
        }
    }
}
