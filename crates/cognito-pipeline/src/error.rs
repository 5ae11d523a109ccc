//! Orchestration errors

use thiserror::Error;

/// Errors that end a synthesis run
///
/// Per-item failures never surface here; they are recorded as degradations
/// in the output instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Nothing to process
    #[error("Insufficient input: {0}")]
    InsufficientInput(String),

    /// A stage update arrived in the wrong order
    #[error("Stage {update} cannot follow {current}")]
    OutOfOrder {
        /// Stage the state was in
        current: &'static str,
        /// Update that was rejected
        update: &'static str,
    },

    /// An orchestration step failed as a whole
    #[error("Orchestration failed: {0}")]
    Orchestration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
