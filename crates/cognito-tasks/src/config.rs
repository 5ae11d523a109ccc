//! Configuration for the task tracker

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the task tracker
///
/// # Examples
///
/// ```
/// use cognito_tasks::TrackerConfig;
///
/// let config = TrackerConfig::from_toml("retention_secs = 60").unwrap();
/// assert_eq!(config.retention().as_secs(), 60);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// How long finished tasks stay in memory before eviction (seconds)
    ///
    /// Evicted tasks are still answered from the session store.
    pub retention_secs: u64,

    /// User recorded on sessions when the caller does not name one
    pub default_user: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            retention_secs: 3600,
            default_user: "local".to_string(),
        }
    }
}

impl TrackerConfig {
    /// Retention as a Duration
    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_user.trim().is_empty() {
            return Err("default_user must not be empty".to_string());
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
