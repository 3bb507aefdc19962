use serde::{Deserialize, Serialize};

use super::table::{Row, Table, Value};

/// Placeholder rendered for projected fields that a hit does not carry
pub const NOT_AVAILABLE: &str = "not available";

/// Largest candidate pool accepted by the search backend
pub const MAX_NUM_CANDIDATES: usize = 10_000;

/// A k-NN search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query
    pub query: String,

    /// Maximum number of hits to return
    pub top_k: usize,

    /// Candidate pool size (search breadth)
    pub num_candidates: usize,

    /// Fields to return for each hit, in display order
    pub fields: Vec<String>,
}

impl SearchRequest {
    /// Create a request with the default bounds of 10 hits out of 500 candidates
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), top_k: 10, num_candidates: 500, fields: Vec::new() }
    }

    /// Set the number of hits
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Set the candidate pool size
    pub fn with_num_candidates(mut self, num_candidates: usize) -> Self {
        self.num_candidates = num_candidates;
        self
    }

    /// Set the projection; repeated names keep their first position
    pub fn with_fields(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.fields.clear();
        for field in fields {
            let field = field.into();
            if !self.fields.contains(&field) {
                self.fields.push(field);
            }
        }
        self
    }

    /// Check the request bounds, returning a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        if self.query.trim().is_empty() {
            return Err("query text is empty".to_string());
        }
        if self.top_k == 0 {
            return Err("top_k must be at least 1".to_string());
        }
        if self.num_candidates < self.top_k {
            return Err(format!(
                "num_candidates ({}) must be greater than or equal to top_k ({})",
                self.num_candidates, self.top_k
            ));
        }
        if self.num_candidates > MAX_NUM_CANDIDATES {
            return Err(format!(
                "num_candidates ({}) cannot exceed {}",
                self.num_candidates, MAX_NUM_CANDIDATES
            ));
        }
        Ok(())
    }
}

/// A single ranked hit with its projected fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// Document key
    pub id: String,

    /// Similarity score reported by the store
    pub score: f32,

    /// Projected fields in projection order
    pub fields: Row,
}

/// Ordered search results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    /// The query that produced these results
    pub query: String,

    /// Projection, in display order
    pub fields: Vec<String>,

    /// Hits ordered by non-increasing score
    pub hits: Vec<SearchHit>,
}

impl ResultSet {
    /// Build a result set from store hits, projecting each hit's source onto `fields`
    pub fn from_sources(
        query: impl Into<String>,
        fields: Vec<String>,
        hits: impl IntoIterator<Item = (String, f32, serde_json::Map<String, serde_json::Value>)>,
    ) -> Self {
        let hits = hits
            .into_iter()
            .map(|(id, score, source)| {
                let projected = fields
                    .iter()
                    .map(|f| {
                        let value = source
                            .get(f)
                            .map(Value::from_json)
                            .unwrap_or_else(|| Value::Text(NOT_AVAILABLE.to_string()));
                        (f.clone(), value)
                    })
                    .collect();
                SearchHit { id, score, fields: projected }
            })
            .collect();

        Self { query: query.into(), fields, hits }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Convert to a table with the projected columns, preserving hit order
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(self.fields.clone());
        for hit in &self.hits {
            table.push_row(hit.fields.clone());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bounds() {
        assert!(SearchRequest::new("shoes").validate().is_ok());
        assert!(SearchRequest::new("  ").validate().is_err());
        assert!(SearchRequest::new("shoes").with_top_k(0).validate().is_err());
        assert!(SearchRequest::new("shoes").with_top_k(20).with_num_candidates(10).validate().is_err());
        assert!(SearchRequest::new("shoes").with_num_candidates(10_001).validate().is_err());
    }

    #[test]
    fn test_repeated_fields_are_dropped() {
        let request = SearchRequest::new("shoes").with_fields(["desc", "name", "desc"]);
        assert_eq!(request.fields, vec!["desc", "name"]);
    }

    #[test]
    fn test_missing_projected_field_uses_placeholder() {
        let mut source = serde_json::Map::new();
        source.insert("ProductName".to_string(), serde_json::json!("Runner"));

        let results = ResultSet::from_sources(
            "shoes",
            vec!["ProductName".to_string(), "Description".to_string()],
            vec![("1".to_string(), 0.9, source)],
        );

        let hit = &results.hits[0];
        assert_eq!(hit.fields["ProductName"], Value::from("Runner"));
        assert_eq!(hit.fields["Description"], Value::from(NOT_AVAILABLE));
    }

    #[test]
    fn test_to_table_preserves_order() {
        let hits = (0..3).map(|i| {
            let mut source = serde_json::Map::new();
            source.insert("name".to_string(), serde_json::json!(format!("item-{}", i)));
            (i.to_string(), 1.0 - i as f32 * 0.1, source)
        });
        let results = ResultSet::from_sources("q", vec!["name".to_string()], hits);
        let table = results.to_table();

        let names: Vec<String> = table.string_rows().map(|r| r[0].clone()).collect();
        assert_eq!(names, vec!["item-0", "item-1", "item-2"]);
    }
}
