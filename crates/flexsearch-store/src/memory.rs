//! In-memory search index for development and testing.
//!
//! Scores follow the Elasticsearch cosine convention, `(1 + cos) / 2`, so
//! results are comparable across backends.

use async_trait::async_trait;
use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::Document;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::{IndexInfo, IndexSettings, KnnQuery, SearchIndex, StoredHit};

#[derive(Debug, Clone)]
struct StoredDocument {
    source: Map<String, Value>,
    vector: Vec<f32>,
}

#[derive(Debug, Clone)]
struct MemoryIndex {
    settings: IndexSettings,
    documents: IndexMap<String, StoredDocument>,
}

/// In-memory implementation of SearchIndex
#[derive(Debug, Clone, Default)]
pub struct MemorySearchIndex {
    indexes: Arc<RwLock<HashMap<String, MemoryIndex>>>,
}

impl MemorySearchIndex {
    /// Create a new empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored document's source by ID
    pub fn get_source(&self, index: &str, id: &str) -> Option<Map<String, Value>> {
        let indexes = self.indexes.read().ok()?;
        indexes.get(index)?.documents.get(id).map(|doc| doc.source.clone())
    }

    /// Calculate cosine similarity between two vectors
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        if a.len() != b.len() {
            return 0.0;
        }

        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        dot_product / (norm_a * norm_b)
    }

    fn project(source: &Map<String, Value>, fields: &[String]) -> Map<String, Value> {
        if fields.is_empty() {
            return source.clone();
        }
        fields
            .iter()
            .filter_map(|f| source.get(f).map(|v| (f.clone(), v.clone())))
            .collect()
    }
}

fn poisoned<T>(_: T) -> FlexsearchError {
    FlexsearchError::Serialization("in-memory index lock poisoned".to_string())
}

fn missing_index(index: &str) -> FlexsearchError {
    FlexsearchError::search(format!("index '{}' does not exist", index))
}

#[async_trait]
impl SearchIndex for MemorySearchIndex {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn index_exists(&self, index: &str) -> Result<bool> {
        let indexes = self.indexes.read().map_err(poisoned)?;
        Ok(indexes.contains_key(index))
    }

    async fn create_index(&self, index: &str, settings: &IndexSettings) -> Result<()> {
        let mut indexes = self.indexes.write().map_err(poisoned)?;
        if indexes.contains_key(index) {
            return Err(FlexsearchError::Index {
                id: index.to_string(),
                reason: "index already exists".to_string(),
            });
        }
        indexes.insert(
            index.to_string(),
            MemoryIndex { settings: settings.clone(), documents: IndexMap::new() },
        );
        Ok(())
    }

    async fn index_info(&self, index: &str) -> Result<Option<IndexInfo>> {
        let indexes = self.indexes.read().map_err(poisoned)?;
        Ok(indexes.get(index).map(|stored| IndexInfo {
            name: index.to_string(),
            vector_field: Some(stored.settings.vector_field.clone()),
            dimensions: Some(stored.settings.dimensions),
            model: Some(stored.settings.model.clone()),
        }))
    }

    async fn upsert(&self, index: &str, document: &Document) -> Result<()> {
        let mut indexes = self.indexes.write().map_err(poisoned)?;
        let stored = indexes.get_mut(index).ok_or_else(|| FlexsearchError::Index {
            id: document.id.to_string(),
            reason: format!("index '{}' does not exist", index),
        })?;

        if document.vector.len() != stored.settings.dimensions {
            return Err(FlexsearchError::Index {
                id: document.id.to_string(),
                reason: format!(
                    "vector has {} dimensions, field '{}' expects {}",
                    document.vector.len(),
                    stored.settings.vector_field,
                    stored.settings.dimensions
                ),
            });
        }

        let mut source = document.to_source();
        source.remove(&document.vector_field);
        stored.documents.insert(
            document.id.to_string(),
            StoredDocument { source, vector: document.vector.clone() },
        );
        Ok(())
    }

    async fn refresh(&self, index: &str) -> Result<()> {
        let indexes = self.indexes.read().map_err(poisoned)?;
        if indexes.contains_key(index) {
            Ok(())
        } else {
            Err(missing_index(index))
        }
    }

    async fn count(&self, index: &str) -> Result<u64> {
        let indexes = self.indexes.read().map_err(poisoned)?;
        let stored = indexes.get(index).ok_or_else(|| missing_index(index))?;
        Ok(stored.documents.len() as u64)
    }

    async fn knn_search(&self, index: &str, query: &KnnQuery) -> Result<Vec<StoredHit>> {
        let indexes = self.indexes.read().map_err(poisoned)?;
        let stored = indexes.get(index).ok_or_else(|| missing_index(index))?;

        if query.field != stored.settings.vector_field {
            return Err(FlexsearchError::search(format!(
                "field '{}' is not a vector field of index '{}'",
                query.field, index
            )));
        }
        if query.vector.len() != stored.settings.dimensions {
            return Err(FlexsearchError::DimensionMismatch {
                index: index.to_string(),
                expected: stored.settings.dimensions,
                actual: query.vector.len(),
            });
        }

        let mut results: Vec<StoredHit> = stored
            .documents
            .iter()
            .map(|(id, doc)| {
                let cosine = Self::cosine_similarity(&query.vector, &doc.vector);
                StoredHit {
                    id: id.clone(),
                    score: (1.0 + cosine) / 2.0,
                    source: Self::project(&doc.source, &query.source),
                }
            })
            .collect();

        // Sort by score descending; ties keep insertion order
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        results.truncate(query.k.min(query.num_candidates));

        Ok(results)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
