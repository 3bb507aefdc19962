//! Export format selection

use flexsearch_core::error::{FlexsearchError, Result};
use flexsearch_core::models::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Base name of downloaded reports
pub const DEFAULT_FILE_STEM: &str = "search_results";

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Pdf];

    /// MIME type sent with downloads
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
        }
    }

    /// Default download file name, e.g. `search_results.xlsx`
    pub fn file_name(&self) -> String {
        format!("{}.{}", DEFAULT_FILE_STEM, self.extension())
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Pdf => "PDF",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = FlexsearchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" => Ok(ExportFormat::Xlsx),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(FlexsearchError::Export {
                format: other.to_string(),
                reason: "unsupported format (expected csv, xlsx or pdf)".to_string(),
            }),
        }
    }
}

/// Encode `table` in the requested format
pub fn export(table: &Table, format: ExportFormat) -> Result<Vec<u8>> {
    debug!(format = %format, rows = table.len(), columns = table.columns.len(), "exporting table");
    match format {
        ExportFormat::Csv => crate::csv::to_csv(table),
        ExportFormat::Xlsx => crate::xlsx::to_xlsx(table),
        ExportFormat::Pdf => crate::pdf::to_pdf(table),
    }
}
