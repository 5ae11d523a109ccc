//! Task tracking errors

use thiserror::Error;

/// Errors from the task tracker
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaskError {
    /// The session store could not be read
    #[error("Session store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
