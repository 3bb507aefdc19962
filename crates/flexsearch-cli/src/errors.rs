use console::style;
use flexsearch_core::error::FlexsearchError;
use flexsearch_llm::EmbeddingModel;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Search backend unreachable
pub fn backend_unreachable(url: &str, reason: &str) -> CliError {
    CliError::new("Cannot connect to Elasticsearch")
        .with_context(format!("The search backend did not answer.\n\nURL: {}\nError: {}", url, reason))
        .with_suggestion("Start Elasticsearch, e.g. docker run -p 9200:9200 -e discovery.type=single-node elasticsearch:8.15.0")
        .with_suggestion("Or point to another cluster: export FLEXSEARCH_ELASTICSEARCH_URL=\"http://host:9200\"")
        .with_suggestion("Or try the in-memory backend: --backend memory")
        .with_help("Run: flexsearch doctor")
}

/// Embedding service failure
pub fn embedder_not_available(model: &str, reason: &str, remediation: &str) -> CliError {
    CliError::new("Embedding failed")
        .with_context(format!("Model: {}\nError: {}", model, reason))
        .with_suggestion(remediation.to_string())
        .with_suggestion("Or use the offline embedder: export FLEXSEARCH_EMBEDDER_PROVIDER=hashing")
        .with_help("Run: flexsearch doctor")
}

/// Missing dataset file
pub fn dataset_not_found(path: &str) -> CliError {
    CliError::new("Dataset file not found")
        .with_context(format!("The specified dataset file does not exist.\n\nPath: {}", path))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
        .with_help("Run: flexsearch preview --help")
}

/// Column absent from the dataset header
pub fn column_not_found(name: &str, available: &[String]) -> CliError {
    CliError::new(format!("Column '{}' not found", name))
        .with_context(format!("Available columns: {}", available.join(", ")))
        .with_suggestion("Check the column name (matching is case-sensitive)")
        .with_suggestion("List the columns: flexsearch preview <file.csv>")
}

/// Model outside the allow-list
pub fn unknown_model(name: &str) -> CliError {
    CliError::new(format!("Unknown embedding model '{}'", name))
        .with_context(format!("Supported models: {}", EmbeddingModel::names().join(", ")))
        .with_suggestion("Pick one of the supported models: --model all-mpnet-base-v2")
        .with_help("Run: flexsearch models")
}

/// Index vectors and query vectors disagree in length
pub fn dimension_mismatch(index: &str, expected: usize, actual: usize) -> CliError {
    CliError::new("Embedding dimension mismatch")
        .with_context(format!(
            "Index '{}' stores {}-dimensional vectors but the selected model produces {}.",
            index, expected, actual
        ))
        .with_suggestion("Search with the model the index was built with")
        .with_suggestion("Or index into a different index: --index <name>")
}

/// Invalid configuration value
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check flexsearch.toml and FLEXSEARCH_* environment variables")
        .with_help("Run: flexsearch doctor")
}

/// Map a domain error to a user-facing error with suggestions
pub fn from_flexsearch(error: &FlexsearchError) -> CliError {
    match error {
        FlexsearchError::Connection { url, reason } => backend_unreachable(url, reason),
        FlexsearchError::Embedding { model, reason, remediation } => {
            embedder_not_available(model, reason, remediation)
        }
        FlexsearchError::DatasetNotFound { path } => dataset_not_found(&path.display().to_string()),
        FlexsearchError::ColumnNotFound { name, available } => column_not_found(name, available),
        FlexsearchError::UnknownModel { name, .. } => unknown_model(name),
        FlexsearchError::DimensionMismatch { index, expected, actual } => {
            dimension_mismatch(index, *expected, *actual)
        }
        FlexsearchError::ConfigInvalid { key, reason } => invalid_config(key, reason),
        other => CliError::new(other.to_string()),
    }
}

/// Convert anyhow::Error to CliError with context
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    if let Some(cli_error) = error.downcast_ref::<CliError>() {
        return CliError {
            message: cli_error.message.clone(),
            context: cli_error.context.clone(),
            suggestions: cli_error.suggestions.clone(),
            help_command: cli_error.help_command.clone(),
        };
    }

    if let Some(domain) = error.chain().find_map(|e| e.downcast_ref::<FlexsearchError>()) {
        let mut mapped = from_flexsearch(domain);
        let outer = error.to_string();
        if outer != domain.to_string() {
            mapped.context = Some(match mapped.context.take() {
                Some(context) => format!("{}\n\n{}", outer, context),
                None => outer,
            });
        }
        return mapped;
    }

    let message = error.to_string();
    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else if message.contains("permission denied") {
        CliError::new("Permission denied")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check file permissions")
    } else {
        CliError::new(format!("{:#}", error))
    }
}
