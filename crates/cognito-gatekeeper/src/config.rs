//! Validator configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with a hypothesis the model judges invalid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidPolicy {
    /// Keep it, tagged `unvalidated`
    #[default]
    RetainUnvalidated,
    /// Remove it from the output
    Drop,
}

/// Configuration for hypothesis validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Response token budget per hypothesis
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum time for a single validation call (seconds)
    pub call_timeout_secs: u64,

    /// Handling of hypotheses judged invalid
    pub invalid_policy: InvalidPolicy,

    /// Hypotheses validated concurrently (1 = sequential)
    pub concurrency: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1_000,
            temperature: 0.7,
            call_timeout_secs: 30,
            invalid_policy: InvalidPolicy::RetainUnvalidated,
            concurrency: 1,
        }
    }
}

impl ValidationConfig {
    /// Strict preset: drop hypotheses judged invalid
    pub fn strict() -> Self {
        Self {
            invalid_policy: InvalidPolicy::Drop,
            ..Self::default()
        }
    }

    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be within [0.0, 2.0]".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
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
