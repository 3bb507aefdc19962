use serde::{Deserialize, Serialize};
use std::fmt;

use super::table::{Row, Value};

/// Document key, derived from the value of the ID column
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub String);

impl DocumentId {
    /// Derive the document ID from a cell value
    pub fn from_value(value: &Value) -> Self {
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A dataset row plus its embedding vector
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document key
    pub id: DocumentId,

    /// Original row fields
    pub fields: Row,

    /// Name of the injected vector field
    pub vector_field: String,

    /// Embedding of the text column
    pub vector: Vec<f32>,
}

impl Document {
    /// Build a document from a row, its key and its embedding
    pub fn new(id: DocumentId, fields: Row, vector_field: impl Into<String>, vector: Vec<f32>) -> Self {
        Self { id, fields, vector_field: vector_field.into(), vector }
    }

    /// Flat JSON body as stored in the index: every column plus the vector field
    pub fn to_source(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut source: serde_json::Map<String, serde_json::Value> =
            self.fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect();
        source.insert(
            self.vector_field.clone(),
            serde_json::Value::Array(self.vector.iter().map(|x| serde_json::Value::from(*x)).collect()),
        );
        source
    }
}
