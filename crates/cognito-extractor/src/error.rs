//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur while extracting one document
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractorError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The LLM call did not finish in time
    #[error("Extraction timeout")]
    Timeout,

    /// Document has no text to analyze
    #[error("Document {0} has no text")]
    EmptyDocument(String),

    /// Document id appeared earlier in the same batch
    #[error("Duplicate document id: {0}")]
    DuplicateDocument(String),

    /// Reply was JSON but not the expected shape
    #[error("Invalid extraction format: {0}")]
    InvalidFormat(String),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for ExtractorError {
    fn from(e: serde_json::Error) -> Self {
        ExtractorError::JsonParse(e.to_string())
    }
}
