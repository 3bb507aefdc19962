use crate::error::{FlexsearchError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "flexsearch.toml";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Which embedding adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderProvider {
    /// OpenAI-compatible HTTP embedding service
    Http,
    /// Offline feature-hashing embedder
    Hashing,
}

impl std::fmt::Display for EmbedderProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbedderProvider::Http => f.write_str("http"),
            EmbedderProvider::Hashing => f.write_str("hashing"),
        }
    }
}

/// Layered configuration for Flexsearch
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub elasticsearch_url: ConfigValue<String>,
    pub elasticsearch_username: ConfigValue<Option<String>>,
    pub elasticsearch_password: ConfigValue<Option<String>>,
    pub index_name: ConfigValue<String>,
    pub vector_field: ConfigValue<String>,
    pub model: ConfigValue<String>,
    pub embedder_url: ConfigValue<String>,
    pub embedder_provider: ConfigValue<EmbedderProvider>,
    pub top_k: ConfigValue<usize>,
    pub num_candidates: ConfigValue<usize>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            elasticsearch_url: ConfigValue::new(
                "http://localhost:9200".to_string(),
                ConfigSource::Default,
            ),
            elasticsearch_username: ConfigValue::new(None, ConfigSource::Default),
            elasticsearch_password: ConfigValue::new(None, ConfigSource::Default),
            index_name: ConfigValue::new("user_uploaded_data".to_string(), ConfigSource::Default),
            vector_field: ConfigValue::new("DescriptionVector".to_string(), ConfigSource::Default),
            model: ConfigValue::new("all-mpnet-base-v2".to_string(), ConfigSource::Default),
            embedder_url: ConfigValue::new(
                "http://localhost:8080".to_string(),
                ConfigSource::Default,
            ),
            embedder_provider: ConfigValue::new(EmbedderProvider::Http, ConfigSource::Default),
            top_k: ConfigValue::new(10, ConfigSource::Default),
            num_candidates: ConfigValue::new(500, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FlexsearchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FlexsearchError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(url) = file_config.elasticsearch_url {
            self.elasticsearch_url.update(url, ConfigSource::File);
        }

        if let Some(username) = file_config.elasticsearch_username {
            self.elasticsearch_username.update(Some(username), ConfigSource::File);
        }

        if let Some(password) = file_config.elasticsearch_password {
            self.elasticsearch_password.update(Some(password), ConfigSource::File);
        }

        if let Some(index_name) = file_config.index_name {
            self.index_name.update(index_name, ConfigSource::File);
        }

        if let Some(vector_field) = file_config.vector_field {
            self.vector_field.update(vector_field, ConfigSource::File);
        }

        if let Some(model) = file_config.model {
            self.model.update(model, ConfigSource::File);
        }

        if let Some(embedder_url) = file_config.embedder_url {
            self.embedder_url.update(embedder_url, ConfigSource::File);
        }

        if let Some(provider) = file_config.embedder_provider {
            self.embedder_provider.update(provider, ConfigSource::File);
        }

        if let Some(top_k) = file_config.top_k {
            self.top_k.update(top_k, ConfigSource::File);
        }

        if let Some(num_candidates) = file_config.num_candidates {
            self.num_candidates.update(num_candidates, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load the config file only if it exists
    pub fn load_from_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(url) = env::var("FLEXSEARCH_ELASTICSEARCH_URL") {
            self.elasticsearch_url.update(url, ConfigSource::Environment);
        }

        if let Ok(username) = env::var("FLEXSEARCH_ELASTICSEARCH_USERNAME") {
            self.elasticsearch_username.update(Some(username), ConfigSource::Environment);
        }

        if let Ok(password) = env::var("FLEXSEARCH_ELASTICSEARCH_PASSWORD") {
            self.elasticsearch_password.update(Some(password), ConfigSource::Environment);
        }

        if let Ok(index_name) = env::var("FLEXSEARCH_INDEX") {
            self.index_name.update(index_name, ConfigSource::Environment);
        }

        if let Ok(vector_field) = env::var("FLEXSEARCH_VECTOR_FIELD") {
            self.vector_field.update(vector_field, ConfigSource::Environment);
        }

        if let Ok(model) = env::var("FLEXSEARCH_MODEL") {
            self.model.update(model, ConfigSource::Environment);
        }

        if let Ok(embedder_url) = env::var("FLEXSEARCH_EMBEDDER_URL") {
            self.embedder_url.update(embedder_url, ConfigSource::Environment);
        }

        if let Ok(provider_str) = env::var("FLEXSEARCH_EMBEDDER_PROVIDER") {
            match parse_embedder_provider(&provider_str) {
                Ok(provider) => self.embedder_provider.update(provider, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FLEXSEARCH_EMBEDDER_PROVIDER value '{}': expected http or hashing",
                    provider_str
                ),
            }
        }

        if let Ok(top_k_str) = env::var("FLEXSEARCH_TOP_K") {
            match top_k_str.parse::<usize>() {
                Ok(top_k) => self.top_k.update(top_k, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FLEXSEARCH_TOP_K value '{}': expected a positive integer",
                    top_k_str
                ),
            }
        }

        if let Ok(candidates_str) = env::var("FLEXSEARCH_NUM_CANDIDATES") {
            match candidates_str.parse::<usize>() {
                Ok(n) => self.num_candidates.update(n, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FLEXSEARCH_NUM_CANDIDATES value '{}': expected a positive integer",
                    candidates_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(url) = overrides.elasticsearch_url {
            self.elasticsearch_url.update(url, ConfigSource::Cli);
        }

        if let Some(index_name) = overrides.index_name {
            self.index_name.update(index_name, ConfigSource::Cli);
        }

        if let Some(model) = overrides.model {
            self.model.update(model, ConfigSource::Cli);
        }

        if let Some(embedder_url) = overrides.embedder_url {
            self.embedder_url.update(embedder_url, ConfigSource::Cli);
        }

        if let Some(provider) = overrides.embedder_provider {
            self.embedder_provider.update(provider, ConfigSource::Cli);
        }

        if let Some(top_k) = overrides.top_k {
            self.top_k.update(top_k, ConfigSource::Cli);
        }

        if let Some(num_candidates) = overrides.num_candidates {
            self.num_candidates.update(num_candidates, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    ///
    /// The password is masked.
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "elasticsearch_url".to_string(),
            (self.elasticsearch_url.value.clone(), self.elasticsearch_url.source),
        );

        map.insert(
            "elasticsearch_username".to_string(),
            (
                self.elasticsearch_username.value.clone().unwrap_or_else(|| "(none)".to_string()),
                self.elasticsearch_username.source,
            ),
        );

        map.insert(
            "elasticsearch_password".to_string(),
            (
                if self.elasticsearch_password.value.is_some() { "****" } else { "(none)" }
                    .to_string(),
                self.elasticsearch_password.source,
            ),
        );

        map.insert("index_name".to_string(), (self.index_name.value.clone(), self.index_name.source));

        map.insert(
            "vector_field".to_string(),
            (self.vector_field.value.clone(), self.vector_field.source),
        );

        map.insert("model".to_string(), (self.model.value.clone(), self.model.source));

        map.insert(
            "embedder_url".to_string(),
            (self.embedder_url.value.clone(), self.embedder_url.source),
        );

        map.insert(
            "embedder_provider".to_string(),
            (self.embedder_provider.value.to_string(), self.embedder_provider.source),
        );

        map.insert("top_k".to_string(), (self.top_k.value.to_string(), self.top_k.source));

        map.insert(
            "num_candidates".to_string(),
            (self.num_candidates.value.to_string(), self.num_candidates.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    elasticsearch_url: Option<String>,
    elasticsearch_username: Option<String>,
    elasticsearch_password: Option<String>,
    index_name: Option<String>,
    vector_field: Option<String>,
    model: Option<String>,
    embedder_url: Option<String>,
    embedder_provider: Option<EmbedderProvider>,
    top_k: Option<usize>,
    num_candidates: Option<usize>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub elasticsearch_url: Option<String>,
    pub index_name: Option<String>,
    pub model: Option<String>,
    pub embedder_url: Option<String>,
    pub embedder_provider: Option<EmbedderProvider>,
    pub top_k: Option<usize>,
    pub num_candidates: Option<usize>,
}

/// Parse embedder provider from string
pub fn parse_embedder_provider(s: &str) -> Result<EmbedderProvider> {
    match s.to_lowercase().as_str() {
        "http" | "openai" => Ok(EmbedderProvider::Http),
        "hashing" | "hash" => Ok(EmbedderProvider::Hashing),
        _ => Err(FlexsearchError::ConfigInvalid {
            key: "embedder_provider".to_string(),
            reason: format!("Invalid embedder provider: {}. Use http or hashing", s),
        }),
    }
}
