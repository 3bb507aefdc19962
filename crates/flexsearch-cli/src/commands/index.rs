use crate::backend::Backend;
use crate::cli::{BackendKind, IndexArgs};
use crate::config_loader::resolve_model;
use crate::dry_run::{ActionType, DryRunPlan, PlannedAction};
use crate::output::OutputWriter;
use crate::output_types::IndexOutput;
use crate::progress::IndexProgressBars;
use anyhow::{Context, Result};
use flexsearch_core::config::LayeredConfig;
use flexsearch_core::error::FlexsearchError;
use flexsearch_core::loader::load_csv_path;

pub async fn execute(
    args: IndexArgs,
    config: &LayeredConfig,
    backend_kind: BackendKind,
    output: &OutputWriter,
) -> Result<()> {
    let model = resolve_model(config)?;
    let table = load_csv_path(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;

    for column in [&args.text_column, &args.id_column] {
        if !table.has_column(column) {
            return Err(FlexsearchError::ColumnNotFound {
                name: column.clone(),
                available: table.columns.clone(),
            }
            .into());
        }
    }

    let backend = Backend::new(backend_kind, config, model)?;

    if args.dry_run {
        let actions = vec![
            PlannedAction::new(ActionType::GenerateEmbeddings, "Embed the text column")
                .with_detail(format!("Model: {} ({} dimensions)", model, model.dimensions()))
                .with_detail(format!("Column: {}", args.text_column))
                .with_detail(format!("Rows: {}", table.len())),
            PlannedAction::new(
                ActionType::CreateIndex,
                format!("Create index '{}' if it does not exist", backend.target.index),
            )
            .with_detail(format!("Vector field: {}", backend.target.vector_field)),
            PlannedAction::new(ActionType::UpsertDocuments, "Upsert one document per row")
                .with_detail(format!("ID column: {}", args.id_column))
                .with_detail(format!("Backend: {}", backend.store.backend_name())),
            PlannedAction::new(ActionType::RefreshIndex, "Refresh the index"),
        ];
        return DryRunPlan::new(backend.target.index.clone(), table.len(), actions).display(output);
    }

    if backend_kind == BackendKind::Memory {
        output.warning("The memory backend is discarded when this command exits");
    }

    output.info(format!(
        "Indexing {} rows from {} into '{}'",
        table.len(),
        args.path.display(),
        backend.target.index
    ));

    let indexer = backend.indexer().with_batch_size(args.batch_size);
    let mut bars = if output.is_json() { None } else { Some(IndexProgressBars::new()) };

    let result = indexer
        .index_table_with_progress(
            &table,
            &backend.target,
            &args.text_column,
            &args.id_column,
            |progress| {
                if let Some(bars) = bars.as_mut() {
                    bars.update(&progress);
                }
            },
        )
        .await;

    let report = match result {
        Ok(report) => {
            if let Some(bars) = bars {
                bars.finish();
            }
            report
        }
        Err(e) => {
            if let Some(bars) = bars {
                bars.abandon();
            }
            return Err(e).with_context(|| format!("Failed to index {}", args.path.display()));
        }
    };

    if output.is_json() {
        output.result(IndexOutput {
            index: report.index.clone(),
            created_index: report.created_index,
            model: report.model.clone(),
            dimensions: report.dimensions,
            succeeded: report.succeeded.len(),
            failed: report.failed.clone(),
        })?;
        return Ok(());
    }

    if report.is_complete() {
        output.success(format!("Indexed {} documents", report.succeeded.len()));
    } else {
        output.warning(format!(
            "Indexed {} of {} documents",
            report.succeeded.len(),
            report.total()
        ));
    }

    output.section("Index Information");
    output.kv("Index", &report.index);
    output.kv("Created", report.created_index);
    output.kv("Model", &report.model);
    output.kv("Dimensions", report.dimensions);

    if !report.failed.is_empty() {
        output.section("Failed Documents");
        for failure in &report.failed {
            output.warning(format!("{}: {}", failure.id, failure.reason));
        }
    }

    Ok(())
}
