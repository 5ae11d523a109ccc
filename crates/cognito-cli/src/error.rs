//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session store error
    #[error("Store error: {0}")]
    Store(String),

    /// Building the LLM backend failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// Task tracking error
    #[error("Task error: {0}")]
    Task(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing stored under the given id
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<cognito_store::StoreError> for CliError {
    fn from(e: cognito_store::StoreError) -> Self {
        CliError::Store(e.to_string())
    }
}

impl From<cognito_tasks::TaskError> for CliError {
    fn from(e: cognito_tasks::TaskError) -> Self {
        CliError::Task(e.to_string())
    }
}
