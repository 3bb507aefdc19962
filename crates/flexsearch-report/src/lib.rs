//! Flexsearch Report - Export of result tables
//!
//! Three independent encoders turn a [`Table`](flexsearch_core::models::Table)
//! into CSV, Excel workbook or PDF bytes. [`ExportFormat`] selects one and
//! carries the MIME type and default file name used for downloads.

pub mod csv;
pub mod format;
pub mod pdf;
pub mod xlsx;

pub use format::{export, ExportFormat};
