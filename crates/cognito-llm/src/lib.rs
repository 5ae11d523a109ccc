//! Cognito LLM Provider Layer
//!
//! Pluggable language-model backends behind the `LlmProvider` trait from
//! `cognito-domain`, plus the response cleanup every caller needs.
//!
//! # Providers
//!
//! - [`MockProvider`]: scripted, deterministic replies for tests
//! - [`OllamaProvider`]: local Ollama API
//! - [`OpenAiProvider`]: any OpenAI-compatible chat completions endpoint
//! - [`Provider`]: runtime selection between the above from [`LlmConfig`]
//!
//! # Response handling
//!
//! Models frequently wrap JSON in Markdown code fences. [`response`] strips
//! them so that a fenced and an unfenced reply parse identically.
//!
//! # Examples
//!
//! ```
//! use cognito_llm::MockProvider;
//! use cognito_domain::{LlmProvider, LlmRequest};
//!
//! # async fn demo() {
//! let provider = MockProvider::new("Hello from LLM!");
//! let reply = provider.generate(&LlmRequest::new("hi")).await.unwrap();
//! assert_eq!(reply, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;
pub mod provider;
pub mod response;

use thiserror::Error;

pub use config::{LlmConfig, ProviderKind};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use provider::Provider;
pub use response::{parse_json, parse_json_value, strip_code_fences};

/// Errors that can occur during LLM operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from LLM
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider misconfigured (missing key, bad endpoint)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}
