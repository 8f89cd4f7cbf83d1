//! Semaphore-bounded concurrent header analysis.
//!
//! Each sheet is one task: a cache hit short-circuits; otherwise the sheet
//! is read, sampled, summarized with a single external call, and written
//! through the cache. At most `concurrency_limit` summarizer calls are in
//! flight at any instant; the permit is held for the whole task and
//! released on every exit path.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use tabula_core::config::AnalysisConfig;
use tabula_core::traits::{ISheetReader, ISummarizer};

use crate::cache::HeaderCache;
use crate::sampler;

pub struct AnalysisDispatcher {
    reader: Arc<dyn ISheetReader>,
    summarizer: Arc<dyn ISummarizer>,
    cache: Arc<HeaderCache>,
    config: AnalysisConfig,
}

impl AnalysisDispatcher {
    pub fn new(
        reader: Arc<dyn ISheetReader>,
        summarizer: Arc<dyn ISummarizer>,
        cache: Arc<HeaderCache>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            reader,
            summarizer,
            cache,
            config,
        }
    }

    /// Analyze the named sheets of one file. The result map contains only
    /// the sheets whose analysis succeeded (cache hit or fresh summary); a
    /// task's failure is logged and never cancels its siblings.
    pub async fn analyze_sheets(
        &self,
        path: &Path,
        sheet_names: &[String],
    ) -> BTreeMap<String, String> {
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency_limit.max(1)));
        let mut tasks = JoinSet::new();

        for sheet_name in sheet_names {
            let semaphore = Arc::clone(&semaphore);
            let reader = Arc::clone(&self.reader);
            let summarizer = Arc::clone(&self.summarizer);
            let cache = Arc::clone(&self.cache);
            let path = path.to_path_buf();
            let sheet_name = sheet_name.clone();
            let sample_row_limit = self.config.sample_row_limit;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                analyze_one(
                    &*reader,
                    &*summarizer,
                    &cache,
                    &path,
                    &sheet_name,
                    sample_row_limit,
                )
                .await
                .map(|summary| (sheet_name, summary))
            });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some((sheet_name, summary))) => {
                    results.insert(sheet_name, summary);
                }
                Ok(None) => {}
                Err(e) => warn!(error = %e, "analysis task panicked"),
            }
        }
        results
    }
}

async fn analyze_one(
    reader: &dyn ISheetReader,
    summarizer: &dyn ISummarizer,
    cache: &HeaderCache,
    path: &Path,
    sheet_name: &str,
    sample_row_limit: usize,
) -> Option<String> {
    match cache.get(path, sheet_name) {
        Ok(Some(summary)) => {
            debug!(sheet = %sheet_name, "header cache hit");
            return Some(summary);
        }
        Ok(None) => {}
        // A lookup failure is not a miss, but fresh analysis still serves
        // the caller; the cause is logged.
        Err(e) => warn!(sheet = %sheet_name, error = %e, "cache lookup failed, analyzing fresh"),
    }

    let sheet = match reader.read_sheet(path, sheet_name) {
        Ok(sheet) => sheet,
        Err(e) => {
            warn!(sheet = %sheet_name, error = %e, "skipping sheet: unreadable");
            return None;
        }
    };

    let sample = sampler::render_sample(&sheet, sample_row_limit);
    let summary = match summarizer.summarize(&sample).await {
        Ok(summary) => summary,
        Err(e) => {
            warn!(sheet = %sheet_name, error = %e, "summarizer failed");
            return None;
        }
    };

    // A cache write failure loses only the caching, not the summary.
    if let Err(e) = cache.put(path, sheet_name, &summary) {
        warn!(sheet = %sheet_name, error = %e, "failed to cache summary");
    }
    Some(summary)
}
