use async_trait::async_trait;
use flexsearch_core::error::Result;
use flexsearch_core::models::Document;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Settings recorded when an index is created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Name of the dense-vector field
    pub vector_field: String,

    /// Vector length
    pub dimensions: usize,

    /// Embedding model that produced the vectors
    pub model: String,
}

/// Metadata read back from an existing index
///
/// Indexes created outside this system may not carry every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexInfo {
    pub name: String,
    pub vector_field: Option<String>,
    pub dimensions: Option<usize>,
    pub model: Option<String>,
}

/// A k-NN query against one vector field
#[derive(Debug, Clone, Serialize)]
pub struct KnnQuery {
    pub field: String,
    pub vector: Vec<f32>,
    pub k: usize,
    pub num_candidates: usize,

    /// Source fields to return with each hit
    pub source: Vec<String>,
}

/// A raw hit returned by the store
#[derive(Debug, Clone)]
pub struct StoredHit {
    pub id: String,
    pub score: f32,
    pub source: serde_json::Map<String, serde_json::Value>,
}

/// Port for a document store with k-NN capability
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Check that the backend is reachable
    async fn ping(&self) -> Result<()>;

    /// Check whether the index exists
    async fn index_exists(&self, index: &str) -> Result<bool>;

    /// Create the index with a vector mapping for `settings.vector_field`
    async fn create_index(&self, index: &str, settings: &IndexSettings) -> Result<()>;

    /// Read index metadata; `None` if the index does not exist
    async fn index_info(&self, index: &str) -> Result<Option<IndexInfo>>;

    /// Insert or overwrite a document by its ID
    async fn upsert(&self, index: &str, document: &Document) -> Result<()>;

    /// Make all upserted documents visible to search
    async fn refresh(&self, index: &str) -> Result<()>;

    /// Number of documents in the index
    async fn count(&self, index: &str) -> Result<u64>;

    /// Return up to `query.k` hits ordered by non-increasing score
    async fn knn_search(&self, index: &str, query: &KnnQuery) -> Result<Vec<StoredHit>>;

    /// Short backend name for diagnostics
    fn backend_name(&self) -> &str;
}

#[async_trait]
impl<S: SearchIndex + ?Sized> SearchIndex for Arc<S> {
    async fn ping(&self) -> Result<()> {
        (**self).ping().await
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        (**self).index_exists(index).await
    }

    async fn create_index(&self, index: &str, settings: &IndexSettings) -> Result<()> {
        (**self).create_index(index, settings).await
    }

    async fn index_info(&self, index: &str) -> Result<Option<IndexInfo>> {
        (**self).index_info(index).await
    }

    async fn upsert(&self, index: &str, document: &Document) -> Result<()> {
        (**self).upsert(index, document).await
    }

    async fn refresh(&self, index: &str) -> Result<()> {
        (**self).refresh(index).await
    }

    async fn count(&self, index: &str) -> Result<u64> {
        (**self).count(index).await
    }

    async fn knn_search(&self, index: &str, query: &KnnQuery) -> Result<Vec<StoredHit>> {
        (**self).knn_search(index, query).await
    }

    fn backend_name(&self) -> &str {
        (**self).backend_name()
    }
}
