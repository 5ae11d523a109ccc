//! Configuration for gap identification, pairing and generation

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Synthesizer stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesizerConfig {
    /// Concepts listed in the gap prompt
    pub max_gap_concepts: usize,

    /// Claims listed in the gap prompt
    pub max_gap_claims: usize,

    /// Characters of each claim shown in the gap prompt
    pub gap_claim_chars: usize,

    /// Upper bound on returned gaps
    pub max_gaps: usize,

    /// Response token budget for gap identification
    pub gap_max_tokens: u32,

    /// Temperature for gap identification
    pub gap_temperature: f32,

    /// Concept pairs handed to the generator (K)
    pub top_pairs: usize,

    /// Response token budget per generated hypothesis
    pub generation_max_tokens: u32,

    /// Elevated temperature for generation
    pub generation_temperature: f32,

    /// Maximum time for a single LLM call (seconds)
    pub call_timeout_secs: u64,

    /// Pairs generated concurrently (1 = sequential)
    pub concurrency: usize,
}

impl SynthesizerConfig {
    /// Get the call timeout as a Duration
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.gap_claim_chars == 0 {
            return Err("gap_claim_chars must be greater than 0".to_string());
        }
        if self.gap_max_tokens == 0 || self.generation_max_tokens == 0 {
            return Err("token budgets must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.generation_temperature)
            || !(0.0..=2.0).contains(&self.gap_temperature)
        {
            return Err("temperatures must be within [0.0, 2.0]".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be greater than 0".to_string());
        }
        if self.concurrency == 0 {
            return Err("concurrency must be at least 1".to_string());
        }
        Ok(())
    }

    /// Aggressive preset: fewer pairs, parallel generation, short timeouts
    pub fn aggressive() -> Self {
        Self {
            max_gap_concepts: 20,
            max_gap_claims: 10,
            max_gaps: 3,
            top_pairs: 3,
            call_timeout_secs: 15,
            concurrency: 3,
            ..Self::default()
        }
    }

    /// Lenient preset: more pairs and context, longer timeouts
    pub fn lenient() -> Self {
        Self {
            max_gap_concepts: 50,
            max_gap_claims: 40,
            top_pairs: 10,
            call_timeout_secs: 90,
            ..Self::default()
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

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            max_gap_concepts: 30,
            max_gap_claims: 20,
            gap_claim_chars: 200,
            max_gaps: 5,
            gap_max_tokens: 2_000,
            gap_temperature: 0.7,
            top_pairs: 5,
            generation_max_tokens: 1_500,
            generation_temperature: 0.8,
            call_timeout_secs: 30,
            concurrency: 1,
        }
    }
}
