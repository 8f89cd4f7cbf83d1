//! The explicit context object wiring the layers together.
//!
//! Constructed once at process start with explicit, ordered
//! initialization, then passed by reference into every operation. There
//! are no lazily-initialized global managers anywhere in the system.

use std::sync::Arc;

use tracing::info;

use tabula_analysis::{AnalysisDispatcher, FreshnessTracker, HeaderCache};
use tabula_core::config::TabulaConfig;
use tabula_core::errors::TabulaResult;
use tabula_core::traits::{ILanguageModel, ISheetReader, ISummarizer, IVectorIndex};
use tabula_storage::SyncEngine;

pub struct PipelineContext {
    pub config: TabulaConfig,
    pub engine: SyncEngine,
    pub cache: Arc<HeaderCache>,
    pub dispatcher: AnalysisDispatcher,
    pub freshness: FreshnessTracker,
    pub reader: Arc<dyn ISheetReader>,
    pub language_model: Arc<dyn ILanguageModel>,
    pub vector_index: Arc<dyn IVectorIndex>,
}

impl PipelineContext {
    /// Build every component in dependency order: storage first, then the
    /// analysis layer on top of it.
    pub fn initialize(
        config: TabulaConfig,
        reader: Arc<dyn ISheetReader>,
        summarizer: Arc<dyn ISummarizer>,
        language_model: Arc<dyn ILanguageModel>,
        vector_index: Arc<dyn IVectorIndex>,
    ) -> TabulaResult<Self> {
        let engine = SyncEngine::open(
            &config.storage.db_path,
            &config.storage.registry_path,
            Arc::clone(&reader),
        )?;
        let cache = Arc::new(HeaderCache::open(
            &config.cache.cache_dir,
            config.cache.max_memory_entries,
        )?);
        let dispatcher = AnalysisDispatcher::new(
            Arc::clone(&reader),
            summarizer,
            Arc::clone(&cache),
            config.analysis.clone(),
        );
        let freshness = FreshnessTracker::new(&config.index.index_dir);

        info!(source_dir = %config.source_dir.display(), "pipeline context initialized");
        Ok(Self {
            config,
            engine,
            cache,
            dispatcher,
            freshness,
            reader,
            language_model,
            vector_index,
        })
    }
}
