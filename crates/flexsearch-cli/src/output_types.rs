use flexsearch_core::config::ConfigSource;
use flexsearch_core::models::{IndexFailure, ResultSet};
use serde::Serialize;
use tabled::Tabled;

/// One row of `flexsearch models`
#[derive(Debug, Serialize, Tabled)]
pub struct ModelRow {
    #[tabled(rename = "Model")]
    pub name: String,
    #[tabled(rename = "Dimensions")]
    pub dimensions: usize,
    #[tabled(rename = "Selected")]
    #[tabled(display_with = "display_selected")]
    pub selected: bool,
}

fn display_selected(selected: &bool) -> String {
    if *selected { "*".to_string() } else { String::new() }
}

/// Output for preview command
#[derive(Debug, Serialize)]
pub struct PreviewOutput {
    pub path: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub rows: Vec<Vec<String>>,
}

/// Output for index command
#[derive(Debug, Serialize)]
pub struct IndexOutput {
    pub index: String,
    pub created_index: bool,
    pub model: String,
    pub dimensions: usize,
    pub succeeded: usize,
    pub failed: Vec<IndexFailure>,
}

/// Output for search command
#[derive(Debug, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub fields: Vec<String>,
    pub results: Vec<SearchResultItem>,
    pub exported_to: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResultItem {
    pub rank: usize,
    pub id: String,
    pub score: f32,
    pub fields: serde_json::Map<String, serde_json::Value>,
}

impl SearchOutput {
    pub fn from_results(results: &ResultSet, exported_to: Option<String>) -> Self {
        let items = results
            .hits
            .iter()
            .enumerate()
            .map(|(i, hit)| SearchResultItem {
                rank: i + 1,
                id: hit.id.clone(),
                score: hit.score,
                fields: hit.fields.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            })
            .collect();

        Self {
            query: results.query.clone(),
            fields: results.fields.clone(),
            results: items,
            exported_to,
        }
    }
}

/// Output for doctor command
#[derive(Debug, Serialize)]
pub struct DoctorOutput {
    pub backend: CheckResult,
    pub embedder: CheckResult,
    pub config: Vec<ConfigEntry>,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize, Tabled)]
pub struct ConfigEntry {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    #[tabled(display_with = "display_source")]
    pub source: ConfigSource,
}

fn display_source(source: &ConfigSource) -> String {
    match source {
        ConfigSource::Default => "default",
        ConfigSource::File => "file",
        ConfigSource::Environment => "env",
        ConfigSource::Cli => "cli",
    }
    .to_string()
}
