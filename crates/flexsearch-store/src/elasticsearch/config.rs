//! Elasticsearch connection configuration

use flexsearch_core::config::LayeredConfig;
use flexsearch_core::error::{FlexsearchError, Result};
use reqwest::Url;
use std::time::Duration;

/// Elasticsearch connection settings
#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    /// Cluster URL, e.g. `http://localhost:9200`
    pub url: String,
    /// Basic-auth username; auth is sent only when set
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ElasticsearchConfig {
    /// Create a configuration for the given cluster URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let config = Self {
            url: url.into(),
            username: None,
            password: None,
            timeout: Duration::from_secs(30),
        };
        config.validate()?;
        Ok(config)
    }

    /// Take the connection settings from the layered configuration
    pub fn from_layered(config: &LayeredConfig) -> Result<Self> {
        let mut es = Self::new(config.elasticsearch_url.value.clone())?;
        es.username = config.elasticsearch_username.value.clone();
        es.password = config.elasticsearch_password.value.clone();
        Ok(es)
    }

    /// Set basic-auth credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(FlexsearchError::ConfigInvalid {
                key: "elasticsearch_url".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }
        self.base_url().map(|_| ())
    }

    /// Parsed cluster URL
    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(self.url.trim()).map_err(|e| FlexsearchError::ConfigInvalid {
            key: "elasticsearch_url".to_string(),
            reason: format!("'{}' is not a valid URL: {}", self.url, e),
        })?;
        if url.cannot_be_a_base() {
            return Err(FlexsearchError::ConfigInvalid {
                key: "elasticsearch_url".to_string(),
                reason: format!("'{}' cannot be used as a base URL", self.url),
            });
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new_valid() {
        let config = ElasticsearchConfig::new("http://localhost:9200").unwrap();
        assert!(config.username.is_none());
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_new_empty_url() {
        match ElasticsearchConfig::new("") {
            Err(FlexsearchError::ConfigInvalid { key, .. }) => {
                assert_eq!(key, "elasticsearch_url");
            }
            _ => panic!("Expected ConfigInvalid error"),
        }
    }

    #[test]
    fn test_config_rejects_garbage_url() {
        assert!(ElasticsearchConfig::new("not a url").is_err());
        assert!(ElasticsearchConfig::new("mailto:ops@example.com").is_err());
    }

    #[test]
    fn test_from_layered_carries_credentials() {
        let mut layered = LayeredConfig::with_defaults();
        layered.elasticsearch_username.value = Some("elastic".to_string());
        layered.elasticsearch_password.value = Some("changeme".to_string());

        let config = ElasticsearchConfig::from_layered(&layered).unwrap();
        assert_eq!(config.url, "http://localhost:9200");
        assert_eq!(config.username.as_deref(), Some("elastic"));
        assert_eq!(config.password.as_deref(), Some("changeme"));
    }
}
