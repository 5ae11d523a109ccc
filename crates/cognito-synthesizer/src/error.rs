//! Error types for the Synthesizer

use thiserror::Error;

/// Errors scoped to one gap-identification or generation call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SynthesizerError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM call did not finish in time
    #[error("LLM call timed out")]
    Timeout,

    /// Reply was JSON but not the expected shape
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SynthesizerError {
    fn from(e: serde_json::Error) -> Self {
        SynthesizerError::JsonParse(e.to_string())
    }
}
