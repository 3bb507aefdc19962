//! Embedding port definition

use async_trait::async_trait;
use flexsearch_core::error::{FlexsearchError, Result};
use std::sync::Arc;

/// Port for embedding text into vector representations
///
/// Every vector produced by one embedder has exactly [`Embedder::dimensions`]
/// elements. Indexing and searching must use embedders of the same model.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embeddings for a batch of texts
    ///
    /// # Arguments
    /// * `texts` - Slice of text strings to embed
    ///
    /// # Returns
    /// Vector of embedding vectors, one per input text, in input order
    async fn encode_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Generate the embedding for a single text
    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        self.encode_many(&[text]).await?.into_iter().next().ok_or_else(|| {
            FlexsearchError::Embedding {
                model: self.model_name().to_string(),
                reason: "embedder returned no vector".to_string(),
                remediation: "Check the embedding service logs".to_string(),
            }
        })
    }

    /// Get the dimensionality of embeddings produced by this embedder
    fn dimensions(&self) -> usize;

    /// Get the name/identifier of the embedding model
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<E: Embedder + ?Sized> Embedder for Arc<E> {
    async fn encode_many(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).encode_many(texts).await
    }

    async fn encode(&self, text: &str) -> Result<Vec<f32>> {
        (**self).encode(text).await
    }

    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Check that every vector has the expected length
pub(crate) fn check_dimensions(model: &str, expected: usize, vectors: &[Vec<f32>]) -> Result<()> {
    if let Some(bad) = vectors.iter().find(|v| v.len() != expected) {
        return Err(FlexsearchError::Embedding {
            model: model.to_string(),
            reason: format!("expected {}-dimensional vectors, got {}", expected, bad.len()),
            remediation: format!("Make sure the embedding service is serving '{}'", model),
        });
    }
    Ok(())
}
