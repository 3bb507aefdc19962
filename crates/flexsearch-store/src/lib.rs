//! Flexsearch Store - Search index port and adapters
//!
//! This crate defines the k-NN search index port and provides an
//! Elasticsearch adapter plus an in-memory adapter for development and tests.

pub mod elasticsearch;
pub mod memory;
pub mod ports;

pub use elasticsearch::{ElasticsearchConfig, ElasticsearchIndex};
pub use memory::MemorySearchIndex;
pub use ports::{IndexInfo, IndexSettings, KnnQuery, SearchIndex, StoredHit};
