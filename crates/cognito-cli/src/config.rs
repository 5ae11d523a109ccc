//! Configuration management for the CLI.
//!
//! One TOML file holds a table per component. Every table is optional and
//! falls back to that component's defaults.

use crate::error::{CliError, Result};
use cognito_agents::{AgentsConfig, SearchConfig};
use cognito_extractor::ExtractorConfig;
use cognito_gatekeeper::ValidationConfig;
use cognito_llm::LlmConfig;
use cognito_pipeline::PipelineConfig;
use cognito_synthesizer::SynthesizerConfig;
use cognito_tasks::TrackerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language-model backend
    pub llm: LlmConfig,
    /// Literature search for the agentic mode
    pub search: SearchConfig,
    /// Concept and claim extraction
    pub extractor: ExtractorConfig,
    /// Gap identification, pairing and generation
    pub synthesizer: SynthesizerConfig,
    /// Hypothesis validation
    pub validation: ValidationConfig,
    /// Agentic roles
    pub agents: AgentsConfig,
    /// Task registry
    pub tracker: TrackerConfig,
    /// Session database
    pub store: StoreSettings,
    /// Terminal output
    pub output: OutputSettings,
}

/// Where sessions are persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// SQLite file; `~/.cognito/sessions.db` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,

    /// Milliseconds between status polls while waiting for a task
    pub poll_interval_ms: u64,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            poll_interval_ms: 500,
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

fn cognito_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(".cognito"))
}

impl AppConfig {
    /// Default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(cognito_dir()?.join("config.toml"))
    }

    /// Load from `path`, or the default path; missing files yield defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => Self::default_path()?,
        };

        let config = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            toml::from_str(&contents)?
        } else {
            Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every section, naming the failing one.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("llm", self.llm.validate()),
            ("search", self.search.validate()),
            ("extractor", self.extractor.validate()),
            ("synthesizer", self.synthesizer.validate()),
            ("validation", self.validation.validate()),
            ("agents", self.agents.validate()),
            ("tracker", self.tracker.validate()),
        ];
        for (section, check) in checks {
            check.map_err(|e| CliError::Config(format!("[{}] {}", section, e)))?;
        }
        Ok(())
    }

    /// Session database path, creating its directory.
    pub fn store_path(&self) -> Result<PathBuf> {
        let path = match &self.store.path {
            Some(path) => path.clone(),
            None => cognito_dir()?.join("sessions.db"),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(path)
    }

    /// Configuration of the deterministic pipeline.
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            extractor: self.extractor.clone(),
            synthesizer: self.synthesizer.clone(),
            validation: self.validation.clone(),
        }
    }
}
