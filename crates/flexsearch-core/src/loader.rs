//! CSV dataset loader
//!
//! Parses delimited text into a [`Table`]. Missing cells are replaced with the
//! `"none"` sentinel before anything else sees them, so the embedding step
//! never receives empty input.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{FlexsearchError, Result};
use crate::models::{Row, Table, Value};

/// Cell contents treated as missing, in addition to the empty string
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Load a table from any CSV reader
pub fn load_csv<R: Read>(reader: R) -> Result<Table> {
    let mut csv_reader =
        csv::ReaderBuilder::new().has_headers(true).flexible(true).from_reader(reader);

    let headers = csv_reader.headers().map_err(csv_error)?.clone();
    if headers.is_empty() {
        return Err(FlexsearchError::Parse { line: Some(1), reason: "missing header row".to_string() });
    }

    let columns = normalize_headers(headers.iter());

    // Cells stay raw until every row is read; types are decided per column
    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(csv_error)?;
        let line = record.position().map(|p| p.line());

        if record.len() > columns.len() {
            return Err(FlexsearchError::Parse {
                line,
                reason: format!("expected {} fields, found {}", columns.len(), record.len()),
            });
        }

        cells.push((0..columns.len()).map(|i| present(record.get(i)).map(str::to_string)).collect());
    }

    let numeric: Vec<bool> = (0..columns.len())
        .map(|i| {
            let mut values = cells.iter().filter_map(|row| row[i].as_deref()).peekable();
            values.peek().is_some() && values.all(|raw| !matches!(Value::infer(raw), Value::Text(_)))
        })
        .collect();

    let mut table = Table::new(columns);
    for raw_row in cells {
        let row: Row = table
            .columns
            .iter()
            .zip(raw_row)
            .zip(&numeric)
            .map(|((column, raw), numeric)| {
                let value = match raw {
                    None => Value::missing(),
                    Some(raw) if *numeric => Value::infer(&raw),
                    Some(raw) => Value::Text(raw),
                };
                (column.clone(), value)
            })
            .collect();
        table.rows.push(row);
    }

    tracing::debug!(columns = table.columns.len(), rows = table.len(), "Loaded CSV dataset");

    Ok(table)
}

/// Load a table from an in-memory buffer, e.g. an uploaded file
pub fn load_csv_bytes(data: &[u8]) -> Result<Table> {
    load_csv(data)
}

/// Load a table from a file on disk
pub fn load_csv_path(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FlexsearchError::DatasetNotFound { path: path.to_path_buf() });
    }
    let file = File::open(path)?;
    load_csv(file)
}

/// The cell text, or `None` when the cell counts as missing
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty() && !NA_TOKENS.contains(s))
}

/// Strip the BOM, name blank headers and de-duplicate repeated names
fn normalize_headers<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();

    for (i, name) in raw.enumerate() {
        let name = name.trim_start_matches('\u{feff}');
        let base = if name.is_empty() { format!("Unnamed: {}", i) } else { name.to_string() };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        seen.insert(candidate.clone());
        columns.push(candidate);
    }

    columns
}

fn csv_error(err: csv::Error) -> FlexsearchError {
    let line = err.position().map(|p| p.line());
    FlexsearchError::Parse { line, reason: err.to_string() }
}
