//! Error types for Flexsearch

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlexsearchError {
    // Dataset errors
    #[error("Failed to parse dataset{}: {reason}", .line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse { line: Option<u64>, reason: String },

    #[error("Dataset file not found at {path}")]
    DatasetNotFound { path: PathBuf },

    #[error("Column '{name}' not found. Available columns: {}", .available.join(", "))]
    ColumnNotFound { name: String, available: Vec<String> },

    // Backend errors
    #[error("Cannot connect to search backend at {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("Embedding failed with model {model}: {reason}. Try: {remediation}")]
    Embedding {
        model: String,
        reason: String,
        remediation: String,
    },

    #[error("Unknown embedding model '{name}'. Available models: {}", .available.join(", "))]
    UnknownModel { name: String, available: Vec<String> },

    // Index errors
    #[error("Failed to index document {id}: {reason}")]
    Index { id: String, reason: String },

    #[error(
        "Refreshing index '{index}' failed after {succeeded} documents were written ({failed} failed): {reason}"
    )]
    Refresh { index: String, succeeded: usize, failed: usize, reason: String },

    #[error("Search failed: {reason}")]
    Search { reason: String },

    #[error(
        "Embedding dimension mismatch: index '{index}' stores {expected}-dimensional vectors, query has {actual}"
    )]
    DimensionMismatch {
        index: String,
        expected: usize,
        actual: usize,
    },

    // Export errors
    #[error("Failed to export {format}: {reason}")]
    Export { format: String, reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FlexsearchError {
    /// Create a search error from any displayable reason
    pub fn search(reason: impl Into<String>) -> Self {
        Self::Search { reason: reason.into() }
    }

    /// Create a parse error without line information
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse { line: None, reason: reason.into() }
    }

    /// Whether the error means the backend could not be reached at all
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

impl From<serde_json::Error> for FlexsearchError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FlexsearchError>;
