//! Command implementations

mod doctor;
mod index;
mod models;
mod preview;
mod search;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config_with_overrides;
use crate::output::OutputWriter;
use anyhow::Result;

/// Execute a CLI command
pub async fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);
    let config = load_config_with_overrides(&cli)?;

    tracing::debug!(
        command = ?cli.command,
        backend = ?cli.backend,
        model = %config.model.value,
        index = %config.index_name.value,
        "Dispatching command"
    );

    match cli.command {
        Commands::Models => models::execute(&config, &output),
        Commands::Preview(args) => preview::execute(args, &output),
        Commands::Index(args) => index::execute(args, &config, cli.backend, &output).await,
        Commands::Search(args) => search::execute(args, &config, cli.backend, &output).await,
        Commands::Doctor(args) => doctor::execute(args, &config, cli.backend, &output).await,
    }
}
