//! Cognito CLI library.
//!
//! Configuration loading, command execution and output formatting for the
//! `cognito` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use output::Formatter;
