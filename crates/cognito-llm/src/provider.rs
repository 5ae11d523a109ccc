//! Runtime provider selection

use crate::config::{LlmConfig, ProviderKind};
use crate::{LlmError, MockProvider, OllamaProvider, OpenAiProvider};
use async_trait::async_trait;
use cognito_domain::{LlmProvider, LlmRequest};
use tracing::info;

/// A configured backend chosen at runtime
pub enum Provider {
    /// Local Ollama
    Ollama(OllamaProvider),
    /// OpenAI-compatible API
    OpenAi(OpenAiProvider),
    /// Scripted mock
    Mock(MockProvider),
}

impl Provider {
    /// Build the backend described by `config`
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        config.validate().map_err(LlmError::Configuration)?;

        let provider = match config.provider {
            ProviderKind::Ollama => {
                let endpoint = config
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| crate::ollama::DEFAULT_ENDPOINT.to_string());
                Provider::Ollama(
                    OllamaProvider::with_timeout(endpoint, &config.model, config.request_timeout())
                        .with_max_retries(config.max_retries),
                )
            }
            ProviderKind::OpenAi => {
                let endpoint = config
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| crate::openai::DEFAULT_ENDPOINT.to_string());
                Provider::OpenAi(
                    OpenAiProvider::from_env(
                        endpoint,
                        &config.model,
                        &config.api_key_env,
                        config.request_timeout(),
                    )?
                    .with_max_retries(config.max_retries),
                )
            }
            ProviderKind::Mock => Provider::Mock(MockProvider::default()),
        };

        info!("Using LLM provider {:?} with model {}", config.provider, provider.model_name());
        Ok(provider)
    }
}

#[async_trait]
impl LlmProvider for Provider {
    type Error = LlmError;

    async fn generate(&self, request: &LlmRequest) -> Result<String, Self::Error> {
        match self {
            Provider::Ollama(p) => p.generate(request).await,
            Provider::OpenAi(p) => p.generate(request).await,
            Provider::Mock(p) => p.generate(request).await,
        }
    }

    fn model_name(&self) -> &str {
        match self {
            Provider::Ollama(p) => p.model_name(),
            Provider::OpenAi(p) => p.model_name(),
            Provider::Mock(p) => p.model_name(),
        }
    }
}
