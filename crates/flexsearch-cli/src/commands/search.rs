use crate::backend::Backend;
use crate::cli::{BackendKind, SearchArgs};
use crate::config_loader::resolve_model;
use crate::output::OutputWriter;
use crate::output_types::SearchOutput;
use crate::progress::create_spinner;
use anyhow::{Context, Result};
use flexsearch_core::config::LayeredConfig;
use flexsearch_core::models::{ResultSet, SearchRequest};
use flexsearch_report::{export, ExportFormat};
use flexsearch_retrieval::Session;
use std::path::{Path, PathBuf};

pub async fn execute(
    args: SearchArgs,
    config: &LayeredConfig,
    backend_kind: BackendKind,
    output: &OutputWriter,
) -> Result<()> {
    let model = resolve_model(config)?;
    let backend = Backend::new(backend_kind, config, model)?;

    if backend_kind == BackendKind::Memory {
        output.warning("The memory backend starts empty; searches only succeed against Elasticsearch");
    }

    let mut session = Session::new(model, backend.target.clone());
    session.set_text_column(args.text_column.clone());

    let request = session.prepare_request(
        SearchRequest::new(&args.query)
            .with_top_k(args.top_k.unwrap_or(config.top_k.value))
            .with_num_candidates(args.candidates.unwrap_or(config.num_candidates.value))
            .with_fields(args.fields.clone()),
    );

    let spinner = if output.is_json() { None } else { Some(create_spinner("Searching...")) };
    let result = backend.searcher().search(&session.target, &request).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    let results = result.with_context(|| format!("Search for '{}' failed", args.query))?;

    let exported_to = match args.export {
        Some(format) => {
            let path = args.output.clone().unwrap_or_else(|| PathBuf::from(format.file_name()));
            write_export(&results, format, &path)?;
            Some(path.display().to_string())
        }
        None => None,
    };

    if output.is_json() {
        output.result(SearchOutput::from_results(&results, exported_to))?;
        return Ok(());
    }

    output.section(format!("Results for '{}'", results.query));
    if results.is_empty() {
        output.info("No matching documents");
    } else {
        let mut header = vec!["Rank".to_string(), "ID".to_string(), "Score".to_string()];
        header.extend(results.fields.iter().cloned());

        let rows = results.hits.iter().enumerate().map(|(i, hit)| {
            let mut row = vec![(i + 1).to_string(), hit.id.clone(), format!("{:.4}", hit.score)];
            row.extend(hit.fields.values().map(|v| v.to_string()));
            row
        });
        output.grid(&header, rows);
    }

    if let Some(path) = exported_to {
        output.success(format!("Exported {} results to {}", results.len(), path));
    }

    Ok(())
}

fn write_export(results: &ResultSet, format: ExportFormat, path: &Path) -> Result<()> {
    let bytes = export(&results.to_table(), format)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write {} export to {}", format.label(), path.display()))
}
