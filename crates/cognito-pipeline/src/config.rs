//! Pipeline configuration

use cognito_extractor::ExtractorConfig;
use cognito_gatekeeper::ValidationConfig;
use cognito_synthesizer::SynthesizerConfig;
use serde::{Deserialize, Serialize};

/// Configuration for every stage of the deterministic pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Concept and claim extraction
    pub extractor: ExtractorConfig,
    /// Gap identification, pairing and generation
    pub synthesizer: SynthesizerConfig,
    /// Validation and citation linking
    pub validation: ValidationConfig,
}

impl PipelineConfig {
    /// Validate every section
    pub fn validate(&self) -> Result<(), String> {
        self.extractor
            .validate()
            .map_err(|e| format!("extractor: {}", e))?;
        self.synthesizer
            .validate()
            .map_err(|e| format!("synthesizer: {}", e))?;
        self.validation
            .validate()
            .map_err(|e| format!("validation: {}", e))
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
