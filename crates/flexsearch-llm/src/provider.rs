//! Embedder construction from configuration

use crate::hashing::HashingEmbedder;
use crate::http::HttpEmbedder;
use crate::models::EmbeddingModel;
use crate::ports::Embedder;
use flexsearch_core::config::EmbedderProvider;
use std::sync::Arc;

/// Build the embedder selected by `provider` for `model`
pub fn build_embedder(
    provider: EmbedderProvider,
    base_url: &str,
    model: EmbeddingModel,
) -> Arc<dyn Embedder> {
    match provider {
        EmbedderProvider::Http => Arc::new(HttpEmbedder::new(base_url, model)),
        EmbedderProvider::Hashing => Arc::new(HashingEmbedder::new(model)),
    }
}
