//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use flexsearch_core::config::{CliConfigOverrides, LayeredConfig, CONFIG_FILE_NAME};
use flexsearch_llm::EmbeddingModel;
use std::path::Path;

use crate::cli::Cli;

/// Load layered configuration: defaults, the config file, then the environment
///
/// An explicit `--config` path must exist; the default `flexsearch.toml` in
/// the working directory is optional.
pub fn load_config(path: Option<&Path>) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults();
    let config = match path {
        Some(path) => config
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => config
            .load_from_optional_file(CONFIG_FILE_NAME)
            .context("Failed to load configuration file")?,
    };
    Ok(config.load_from_env())
}

/// Load layered configuration with the global CLI flags applied on top
pub fn load_config_with_overrides(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    config.update_from_cli(CliConfigOverrides {
        model: cli.model.clone(),
        index_name: cli.index.clone(),
        ..Default::default()
    });
    Ok(config)
}

/// Resolve the configured model name against the allow-list
pub fn resolve_model(config: &LayeredConfig) -> Result<EmbeddingModel> {
    let model = config.model.value.parse::<EmbeddingModel>()?;
    Ok(model)
}
