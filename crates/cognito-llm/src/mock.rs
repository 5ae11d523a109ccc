//! Deterministic mock provider
//!
//! Replies are scripted by prompt substring. Rules are checked in the order
//! they were added and the first match wins; unmatched prompts get the
//! default reply. Every request is recorded so tests can assert on call
//! counts and prompt contents.

use crate::LlmError;
use async_trait::async_trait;
use cognito_domain::{LlmProvider, LlmRequest};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone)]
enum MockReply {
    Text(String),
    Error(String),
    Delayed(Duration, String),
}

#[derive(Debug, Default)]
struct MockState {
    rules: Vec<(String, MockReply)>,
    calls: Vec<LlmRequest>,
}

/// Mock LLM provider for deterministic testing
///
/// Clones share rules and the call log.
///
/// # Examples
///
/// ```
/// use cognito_llm::MockProvider;
///
/// let provider = MockProvider::default();
/// provider.add_response("extract", r#"{"concepts": [], "claims": []}"#);
/// provider.add_error("validate");
/// assert_eq!(provider.call_count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_response: String,
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Create a provider that answers every prompt with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reply with `response` when the prompt contains `key`
    pub fn add_response(&self, key: impl Into<String>, response: impl Into<String>) {
        self.state()
            .rules
            .push((key.into(), MockReply::Text(response.into())));
    }

    /// Fail when the prompt contains `key`
    pub fn add_error(&self, key: impl Into<String>) {
        let key = key.into();
        let message = format!("Mock error for '{}'", key);
        self.state().rules.push((key, MockReply::Error(message)));
    }

    /// Reply with `response` after sleeping for `delay` when the prompt contains `key`
    pub fn add_delayed(&self, key: impl Into<String>, delay: Duration, response: impl Into<String>) {
        self.state()
            .rules
            .push((key.into(), MockReply::Delayed(delay, response.into())));
    }

    /// Number of `generate` calls so far
    pub fn call_count(&self) -> usize {
        self.state().calls.len()
    }

    /// Number of calls whose prompt contained `needle`
    pub fn calls_containing(&self, needle: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|r| r.prompt.contains(needle))
            .count()
    }

    /// Copy of all recorded requests, in call order
    pub fn calls(&self) -> Vec<LlmRequest> {
        self.state().calls.clone()
    }

    /// Reset the call log; rules are kept
    pub fn reset_calls(&self) {
        self.state().calls.clear();
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        let reply = {
            let mut state = self.state();
            state.calls.push(request.clone());
            state
                .rules
                .iter()
                .find(|(key, _)| request.prompt.contains(key.as_str()))
                .map(|(_, reply)| reply.clone())
        };

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Error(message)) => Err(LlmError::Other(message)),
            Some(MockReply::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => Ok(self.default_response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
