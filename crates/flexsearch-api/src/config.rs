use std::env;

use flexsearch_core::config::{LayeredConfig, CONFIG_FILE_NAME};
use flexsearch_core::error::Result;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Search backend, embedder and search defaults
    pub settings: LayeredConfig,
}

impl ApiConfig {
    /// Load configuration from `flexsearch.toml` (when present) and the environment
    pub fn from_env() -> Result<Self> {
        let port = env::var("FLEXSEARCH_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3001);

        let cors_origin = env::var("FLEXSEARCH_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let settings = LayeredConfig::with_defaults()
            .load_from_optional_file(CONFIG_FILE_NAME)?
            .load_from_env();

        Ok(Self { port, cors_origin, settings })
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
