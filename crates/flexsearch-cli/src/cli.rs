use clap::{Parser, Subcommand};
use flexsearch_report::ExportFormat;
use std::path::PathBuf;

/// Flexsearch - semantic search over uploaded CSV data
#[derive(Parser, Debug)]
#[command(name = "flexsearch")]
#[command(about = "Embed a CSV text column, index it and run k-NN searches", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./flexsearch.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Embedding model (see `flexsearch models`)
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Target index name
    #[arg(long, global = true)]
    pub index: Option<String>,

    /// Search backend to use
    #[arg(long, global = true, default_value = "elasticsearch")]
    pub backend: BackendKind,

    #[command(subcommand)]
    pub command: Commands,
}

/// Search backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendKind {
    /// Elasticsearch cluster (default)
    Elasticsearch,
    /// In-memory index, discarded when the command exits
    Memory,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the supported embedding models
    Models,

    /// Show the columns and first rows of a CSV file
    Preview(PreviewArgs),

    /// Embed a CSV file and index its rows
    Index(IndexArgs),

    /// Run a k-NN search against the index
    Search(SearchArgs),

    /// Check backend connectivity and show the effective configuration
    Doctor(DoctorArgs),
}

#[derive(Parser, Debug)]
pub struct PreviewArgs {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Number of rows to show
    #[arg(long, short = 'n', default_value = "5")]
    pub rows: usize,
}

#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Path to the CSV file
    pub path: PathBuf,

    /// Column whose text is embedded
    #[arg(long, short = 't')]
    pub text_column: String,

    /// Column used as the document ID
    #[arg(long, short = 'i')]
    pub id_column: String,

    /// Rows embedded per request
    #[arg(long, default_value = "32")]
    pub batch_size: usize,

    /// Show planned actions without executing them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// The query text
    pub query: String,

    /// Number of results to return
    #[arg(long, short = 'k')]
    pub top_k: Option<usize>,

    /// Candidate pool size
    #[arg(long)]
    pub candidates: Option<usize>,

    /// Fields to show, comma separated (defaults to --text-column)
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Text column shown when no fields are given
    #[arg(long, default_value = "Description")]
    pub text_column: String,

    /// Export the results in this format (csv, xlsx or pdf)
    #[arg(long, value_name = "FORMAT")]
    pub export: Option<ExportFormat>,

    /// Where to write the export (defaults to search_results.<ext>)
    #[arg(long, short = 'o', value_name = "PATH", requires = "export")]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct DoctorArgs {
    /// Show detailed diagnostic information
    #[arg(long)]
    pub verbose: bool,
}
