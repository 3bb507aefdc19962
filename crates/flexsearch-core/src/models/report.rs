use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::DocumentId;

/// A document that could not be upserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexFailure {
    pub id: DocumentId,
    pub reason: String,
}

/// Outcome of one indexing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexReport {
    /// Target index name
    pub index: String,

    /// Whether the index was created by this run
    pub created_index: bool,

    /// Embedding model used
    pub model: String,

    /// Embedding dimension
    pub dimensions: usize,

    /// IDs upserted successfully, in row order
    pub succeeded: Vec<DocumentId>,

    /// IDs that failed, with the reason, in row order
    pub failed: Vec<IndexFailure>,

    /// When the run finished
    pub finished_at: DateTime<Utc>,
}

impl IndexReport {
    /// Create an empty report for an index
    pub fn new(index: impl Into<String>, model: impl Into<String>, dimensions: usize) -> Self {
        Self {
            index: index.into(),
            created_index: false,
            model: model.into(),
            dimensions,
            succeeded: Vec::new(),
            failed: Vec::new(),
            finished_at: Utc::now(),
        }
    }

    /// Total number of rows processed
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// Whether every row was indexed
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}
