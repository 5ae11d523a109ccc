//! OpenAI-compatible chat completions provider

use crate::LlmError;
use async_trait::async_trait;
use cognito_domain::{LlmProvider, LlmRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API base URL
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

/// Provider for `/chat/completions` style APIs
pub struct OpenAiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider with an explicit key
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
            max_retries: 3,
        }
    }

    /// Create a provider reading the key from environment variable `key_env`
    pub fn from_env(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        key_env: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = std::env::var(key_env).map_err(|_| {
            LlmError::Configuration(format!("environment variable {} is not set", key_env))
        })?;
        Ok(Self::new(endpoint, model, api_key, timeout))
    }

    /// Set the maximum number of attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    fn build_messages<'a>(request: &'a LlmRequest) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });
        messages
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        let url = format!("{}/chat/completions", self.endpoint);
        let body = ChatRequest {
            model: &self.model,
            messages: Self::build_messages(request),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut last_error = LlmError::Communication("Max retries exceeded".to_string());
        for attempt in 1..=self.max_retries {
            let sent = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&body)
                .send()
                .await;

            match sent {
                Ok(response) if response.status().is_success() => {
                    let parsed: ChatResponse = response.json().await.map_err(|e| {
                        LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                    })?;
                    let text = parsed
                        .choices
                        .into_iter()
                        .next()
                        .and_then(|c| c.message.content)
                        .ok_or_else(|| LlmError::InvalidResponse("No choices returned".to_string()))?;
                    debug!("{} replied with {} chars", self.model, text.len());
                    return Ok(text);
                }
                Ok(response) if response.status() == reqwest::StatusCode::NOT_FOUND => {
                    return Err(LlmError::ModelNotAvailable(self.model.clone()));
                }
                Ok(response) if response.status() == reqwest::StatusCode::UNAUTHORIZED => {
                    return Err(LlmError::Configuration("API key rejected".to_string()));
                }
                Ok(response) if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                    last_error = LlmError::RateLimitExceeded;
                }
                Ok(response) => {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    last_error = LlmError::Communication(format!("HTTP {}: {}", status, text));
                }
                Err(e) => {
                    last_error = LlmError::Communication(format!("Request failed: {}", e));
                }
            }

            warn!("Chat completion attempt {} failed: {}", attempt, last_error);
            if attempt < self.max_retries {
                tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
            }
        }

        Err(last_error)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
