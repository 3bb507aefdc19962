//! Excel workbook export

use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::{Table, Value};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

/// Name of the single worksheet
pub const SHEET_NAME: &str = "Sheet1";

/// Largest integer magnitude that survives the f64 cell type unchanged
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// Render `table` as an `.xlsx` workbook with one sheet and a header row
///
/// Integers and floats become numeric cells, everything else text.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>> {
    build(table).map_err(|e| FlexsearchError::Export {
        format: "xlsx".to_string(),
        reason: e.to_string(),
    })
}

fn build(table: &Table) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string_with_format(0, column_index(col)?, name, &header_format)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let sheet_row = u32::try_from(row_idx + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
        for (col, name) in table.columns.iter().enumerate() {
            let col = column_index(col)?;
            match row.get(name) {
                Some(Value::Integer(i)) if i.unsigned_abs() <= MAX_EXACT_INTEGER => {
                    worksheet.write_number(sheet_row, col, *i as f64)?;
                }
                Some(Value::Float(f)) => {
                    worksheet.write_number(sheet_row, col, *f)?;
                }
                Some(value) => {
                    worksheet.write_string(sheet_row, col, value.to_string())?;
                }
                None => {
                    worksheet.write_string(sheet_row, col, Value::missing().to_string())?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

fn column_index(col: usize) -> std::result::Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
