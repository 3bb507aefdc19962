//! Flexsearch Core - Domain models, dataset loading, and configuration
//!
//! This crate contains the tabular data model, the CSV loader, the error
//! taxonomy and the layered configuration shared by every other crate.

pub mod config;
pub mod error;
pub mod loader;
pub mod models;

pub use error::{FlexsearchError, Result};
