//! Agent and tool error types

use thiserror::Error;

/// Errors that end an agentic run at the failing role
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AgentError {
    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// A role call did not finish in time
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// The analyzer had nothing it could read
    #[error("Analysis failed: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors from external research tools
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-success status from the search API
    #[error("Search API returned status {0}")]
    Status(u16),

    /// Unexpected response body
    #[error("Invalid search response: {0}")]
    InvalidResponse(String),

    /// The tool did not answer in time
    #[error("Tool {0} timed out")]
    Timeout(&'static str),

    /// Backend-specific failure
    #[error("Search failed: {0}")]
    Search(String),
}

impl From<reqwest::Error> for ToolError {
    fn from(e: reqwest::Error) -> Self {
        ToolError::Http(e.to_string())
    }
}
