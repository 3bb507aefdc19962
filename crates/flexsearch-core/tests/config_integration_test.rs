//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use flexsearch_core::config::{
    CliConfigOverrides, ConfigSource, EmbedderProvider, LayeredConfig, CONFIG_FILE_NAME,
};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const ENV_KEYS: &[&str] = &[
    "FLEXSEARCH_ELASTICSEARCH_URL",
    "FLEXSEARCH_INDEX",
    "FLEXSEARCH_MODEL",
    "FLEXSEARCH_EMBEDDER_PROVIDER",
    "FLEXSEARCH_TOP_K",
    "FLEXSEARCH_NUM_CANDIDATES",
];

fn clear_env() {
    for key in ENV_KEYS {
        env::remove_var(key);
    }
}

#[test]
fn test_partial_file_configuration() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
index_name = "catalog"
# Only override the index, leave others as defaults
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults().load_from_file(file.path()).unwrap();

    assert_eq!(config.index_name.value, "catalog");
    assert_eq!(config.index_name.source, ConfigSource::File);
    assert_eq!(config.model.value, "all-mpnet-base-v2");
    assert_eq!(config.model.source, ConfigSource::Default);
}

#[test]
fn test_optional_file_missing_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let config = LayeredConfig::with_defaults()
        .load_from_optional_file(dir.path().join(CONFIG_FILE_NAME))
        .unwrap();

    assert_eq!(config.index_name.source, ConfigSource::Default);
}

#[test]
#[serial]
fn test_env_overrides_file() {
    clear_env();

    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(&path, "model = \"paraphrase-MiniLM-L6-v2\"\ntop_k = 5\n").unwrap();

    env::set_var("FLEXSEARCH_MODEL", "roberta-base-nli-stsb-mean-tokens");
    env::set_var("FLEXSEARCH_EMBEDDER_PROVIDER", "hashing");

    let config = LayeredConfig::with_defaults().load_from_file(&path).unwrap().load_from_env();

    assert_eq!(config.model.value, "roberta-base-nli-stsb-mean-tokens");
    assert_eq!(config.model.source, ConfigSource::Environment);
    assert_eq!(config.embedder_provider.value, EmbedderProvider::Hashing);
    assert_eq!(config.top_k.value, 5);
    assert_eq!(config.top_k.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_values_are_ignored() {
    clear_env();

    env::set_var("FLEXSEARCH_TOP_K", "lots");
    env::set_var("FLEXSEARCH_EMBEDDER_PROVIDER", "carrier-pigeon");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.top_k.value, 10);
    assert_eq!(config.top_k.source, ConfigSource::Default);
    assert_eq!(config.embedder_provider.value, EmbedderProvider::Http);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_everything() {
    clear_env();

    env::set_var("FLEXSEARCH_INDEX", "from_env");

    let mut config = LayeredConfig::with_defaults().load_from_env();
    config.update_from_cli(CliConfigOverrides {
        index_name: Some("from_cli".to_string()),
        ..Default::default()
    });

    assert_eq!(config.index_name.value, "from_cli");
    assert_eq!(config.index_name.source, ConfigSource::Cli);

    clear_env();
}
