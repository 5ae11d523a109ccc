//! Validator error types

use thiserror::Error;

/// Errors that can occur while validating one hypothesis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidatorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM call did not finish in time
    #[error("Validation timeout")]
    Timeout,

    /// Verdict was JSON but not the expected shape
    #[error("Invalid verdict format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ValidatorError {
    fn from(e: serde_json::Error) -> Self {
        ValidatorError::JsonParse(e.to_string())
    }
}
