//! CSV export

use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::Table;

/// Render `table` as UTF-8 CSV with a header row
///
/// A table without columns renders as empty output.
pub fn to_csv(table: &Table) -> Result<Vec<u8>> {
    if table.columns.is_empty() {
        return Ok(Vec::new());
    }

    let mut writer = ::csv::WriterBuilder::new().has_headers(true).from_writer(Vec::new());

    writer.write_record(&table.columns).map_err(export_error)?;
    for row in table.string_rows() {
        writer.write_record(&row).map_err(export_error)?;
    }

    writer.into_inner().map_err(|e| FlexsearchError::Export {
        format: "csv".to_string(),
        reason: e.to_string(),
    })
}

fn export_error(err: ::csv::Error) -> FlexsearchError {
    FlexsearchError::Export { format: "csv".to_string(), reason: err.to_string() }
}
