use anyhow::{Context, Result};
use flexsearch_core::config::LayeredConfig;
use flexsearch_llm::{build_embedder, Embedder, EmbeddingModel};
use flexsearch_retrieval::{IndexTarget, Indexer, Searcher};
use flexsearch_store::{ElasticsearchConfig, ElasticsearchIndex, MemorySearchIndex, SearchIndex};
use std::sync::Arc;

use crate::cli::BackendKind;

/// Search index and embedder selected by the configuration
pub struct Backend {
    pub kind: BackendKind,
    pub store: Arc<dyn SearchIndex>,
    pub embedder: Arc<dyn Embedder>,
    pub target: IndexTarget,
}

impl Backend {
    pub fn new(kind: BackendKind, config: &LayeredConfig, model: EmbeddingModel) -> Result<Self> {
        let store: Arc<dyn SearchIndex> = match kind {
            BackendKind::Memory => Arc::new(MemorySearchIndex::new()),
            BackendKind::Elasticsearch => {
                let es_config = ElasticsearchConfig::from_layered(config)
                    .context("Invalid Elasticsearch configuration")?;
                Arc::new(ElasticsearchIndex::new(es_config)?)
            }
        };

        let embedder = build_embedder(
            config.embedder_provider.value,
            &config.embedder_url.value,
            model,
        );

        Ok(Self { kind, store, embedder, target: IndexTarget::from_config(config) })
    }

    pub fn indexer(&self) -> Indexer<Arc<dyn SearchIndex>, Arc<dyn Embedder>> {
        Indexer::new(self.store.clone(), self.embedder.clone())
    }

    pub fn searcher(&self) -> Searcher<Arc<dyn SearchIndex>, Arc<dyn Embedder>> {
        Searcher::new(self.store.clone(), self.embedder.clone())
    }
}
