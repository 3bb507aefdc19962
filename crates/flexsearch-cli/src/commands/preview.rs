use crate::cli::PreviewArgs;
use crate::output::OutputWriter;
use crate::output_types::PreviewOutput;
use anyhow::{Context, Result};
use flexsearch_core::loader::load_csv_path;

pub fn execute(args: PreviewArgs, output: &OutputWriter) -> Result<()> {
    let table = load_csv_path(&args.path)
        .with_context(|| format!("Failed to load {}", args.path.display()))?;

    let head = table.head(args.rows);
    let preview = PreviewOutput {
        path: args.path.display().to_string(),
        columns: table.columns.clone(),
        row_count: table.len(),
        rows: head.string_rows().collect(),
    };

    if output.is_json() {
        output.result(preview)?;
    } else {
        output.section(format!("Dataset: {}", preview.path));
        output.kv("Columns", preview.columns.join(", "));
        output.kv("Rows", preview.row_count);
        println!();
        output.grid(&preview.columns, preview.rows);
    }

    Ok(())
}
