//! Agentic orchestration configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the agent roles and their tools
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Research role sampling temperature
    pub research_temperature: f32,

    /// Analyzer role sampling temperature
    pub analyzer_temperature: f32,

    /// Generator role sampling temperature
    pub generator_temperature: f32,

    /// Critic role sampling temperature
    pub critic_temperature: f32,

    /// Response token budget for research, generator and critic calls
    pub role_max_tokens: u32,

    /// Maximum literature searches issued by the research role
    pub research_queries: usize,

    /// Papers requested per search
    pub search_limit: usize,

    /// Concepts shown to the generator role
    pub max_generator_concepts: usize,

    /// Maximum time for one role LLM call (seconds)
    pub call_timeout_secs: u64,

    /// Maximum time for one external tool call (seconds)
    pub tool_timeout_secs: u64,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            research_temperature: 0.3,
            analyzer_temperature: 0.5,
            generator_temperature: 0.8,
            critic_temperature: 0.3,
            role_max_tokens: 2_000,
            research_queries: 3,
            search_limit: 5,
            max_generator_concepts: 10,
            call_timeout_secs: 30,
            tool_timeout_secs: 10,
        }
    }
}

impl AgentsConfig {
    /// Get the role call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Get the tool timeout as a Duration
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        for (name, t) in [
            ("research_temperature", self.research_temperature),
            ("analyzer_temperature", self.analyzer_temperature),
            ("generator_temperature", self.generator_temperature),
            ("critic_temperature", self.critic_temperature),
        ] {
            if !(0.0..=2.0).contains(&t) {
                return Err(format!("{} must be within [0.0, 2.0]", name));
            }
        }
        if self.role_max_tokens == 0 {
            return Err("role_max_tokens must be greater than 0".to_string());
        }
        if self.search_limit == 0 {
            return Err("search_limit must be at least 1".to_string());
        }
        if self.max_generator_concepts < 2 {
            return Err("max_generator_concepts must be at least 2".to_string());
        }
        if self.call_timeout_secs == 0 || self.tool_timeout_secs == 0 {
            return Err("timeouts must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

/// Semantic Scholar client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Base URL of the Graph API
    pub endpoint: String,

    /// HTTP timeout (seconds)
    pub request_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.semanticscholar.org/graph/v1".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl SearchConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(format!("search endpoint must be an http(s) URL: {}", self.endpoint));
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}
