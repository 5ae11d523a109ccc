//! Trait definitions for external interactions
//!
//! These traits define the boundaries between synthesis logic and
//! infrastructure. The language-model backend and literature search are
//! async because every call is a network suspension point; the session
//! store is synchronous and callers move it onto a blocking thread.

use crate::session::{SavedHypothesis, SessionSummary, SynthesisSession};
use crate::task::TaskId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// One request to a language-model backend
#[derive(Debug, Clone, PartialEq)]
pub struct LlmRequest {
    /// User prompt
    pub prompt: String,
    /// Optional system prompt
    pub system_prompt: Option<String>,
    /// Response token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// Request with default budget (1000 tokens) and temperature (0.7)
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: 1000,
            temperature: 0.7,
        }
    }

    /// Set the system prompt
    pub fn with_system(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Set the token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Trait for language-model backends
///
/// Implemented by the infrastructure layer (cognito-llm). Responses may be
/// wrapped in Markdown code fences; callers strip them before parsing.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Error type for LLM operations
    type Error: Display + Send;

    /// Generate a completion
    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error>;

    /// Model identifier, for logs
    fn model_name(&self) -> &str;
}

/// Summary of one paper returned by literature search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    /// Paper title
    pub title: String,
    /// Abstract, truncated by the search backend
    pub abstract_excerpt: String,
    /// Author names
    pub authors: Vec<String>,
    /// Publication year
    pub year: Option<u32>,
    /// Citation count
    pub citation_count: u64,
    /// Landing page
    pub url: Option<String>,
}

/// Trait for external literature search
///
/// Implemented by cognito-agents (Semantic Scholar client, mock).
#[async_trait]
pub trait LiteratureSearch: Send + Sync {
    /// Error type for search operations
    type Error: Display + Send;

    /// Search for up to `limit` papers matching `query`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<PaperSummary>, Self::Error>;
}

/// Trait for persisting synthesis sessions
///
/// Implemented by the infrastructure layer (cognito-store).
pub trait SessionStore: Send + Sync {
    /// Error type for store operations
    type Error: Display + Send;

    /// Insert or replace a session
    fn insert_session(&self, session: &SynthesisSession) -> Result<(), Self::Error>;

    /// Get a session by id
    fn get_session(&self, id: &str) -> Result<Option<SynthesisSession>, Self::Error>;

    /// Get the session produced by a task
    ///
    /// Stores without task-id support return `Ok(None)`.
    fn find_by_task_id(&self, task_id: TaskId) -> Result<Option<SynthesisSession>, Self::Error>;

    /// List a user's sessions, newest first
    fn list_sessions(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SessionSummary>, Self::Error>;

    /// Delete a session owned by `user_id`; returns whether a row was removed
    fn delete_session(&self, id: &str, user_id: &str) -> Result<bool, Self::Error>;

    /// Bookmark one hypothesis of a session owned by `user_id`
    ///
    /// Returns `Ok(None)` when the session does not exist, belongs to
    /// another user, or has no hypothesis with that id.
    fn save_hypothesis(
        &self,
        session_id: &str,
        hypothesis_id: &str,
        user_id: &str,
        notes: &str,
    ) -> Result<Option<SavedHypothesis>, Self::Error>;

    /// A user's saved hypotheses, newest first
    fn list_saved(&self, user_id: &str) -> Result<Vec<SavedHypothesis>, Self::Error>;
}
