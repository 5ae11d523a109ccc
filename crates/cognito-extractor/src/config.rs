//! Configuration for the Extractor

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Characters of document text sent to the model
    pub max_excerpt_chars: usize,

    /// Response token budget per document
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum time for a single extraction call (seconds)
    pub call_timeout_secs: u64,

    /// Documents processed concurrently (1 = sequential)
    pub concurrency: usize,
}

impl ExtractorConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_excerpt_chars == 0 {
            return Err("max_excerpt_chars must be greater than 0".to_string());
        }
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

    /// Aggressive preset: short excerpts, short timeouts, parallel documents
    pub fn aggressive() -> Self {
        Self {
            max_excerpt_chars: 12_000,
            max_tokens: 2_000,
            temperature: 0.7,
            call_timeout_secs: 15,
            concurrency: 4,
        }
    }

    /// Lenient preset: longer excerpts and timeouts for better coverage
    pub fn lenient() -> Self {
        Self {
            max_excerpt_chars: 40_000,
            max_tokens: 4_000,
            temperature: 0.7,
            call_timeout_secs: 90,
            concurrency: 1,
        }
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

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_excerpt_chars: 25_000,
            max_tokens: 3_000,
            temperature: 0.7,
            call_timeout_secs: 30,
            concurrency: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(ExtractorConfig::default().validate().is_ok());
        assert!(ExtractorConfig::aggressive().validate().is_ok());
        assert!(ExtractorConfig::lenient().validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = ExtractorConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::aggressive();
        let parsed = ExtractorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_toml() {
        let config = ExtractorConfig::from_toml("concurrency = 3").unwrap();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.max_excerpt_chars, 25_000);
    }
}
