//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Cognito CLI - Synthesize research hypotheses from papers.
#[derive(Debug, Parser)]
#[command(name = "cognito")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "COGNITO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run synthesis over plain-text papers and wait for the result
    Synthesize(SynthesizeArgs),

    /// Show the status of a task
    Status(TaskArgs),

    /// Show the result of a finished task
    Result(TaskArgs),

    /// Browse persisted sessions
    Sessions(SessionsArgs),
}

/// Arguments for the synthesize command.
#[derive(Debug, Parser)]
pub struct SynthesizeArgs {
    /// Text files, one paper each
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Research focus area
    #[arg(long)]
    pub focus: Option<String>,

    /// Use the agentic supervisor instead of the deterministic pipeline
    #[arg(long)]
    pub agentic: bool,

    /// User recorded on the session
    #[arg(short, long, env = "COGNITO_USER")]
    pub user: Option<String>,
}

/// Arguments naming a task.
#[derive(Debug, Parser)]
pub struct TaskArgs {
    /// Task id printed by `synthesize`
    pub task_id: String,

    /// Only answer for tasks owned by this user
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Arguments for session browsing.
#[derive(Debug, Parser)]
pub struct SessionsArgs {
    #[command(subcommand)]
    pub action: SessionAction,
}

/// Session browsing actions.
#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// List a user's sessions, newest first
    List {
        /// Owning user; the configured default when absent
        #[arg(short, long, env = "COGNITO_USER")]
        user: Option<String>,
        /// Maximum number of sessions
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Sessions to skip
        #[arg(long, default_value = "0")]
        offset: usize,
    },

    /// Show one session with its hypotheses
    Show {
        /// Session id
        id: String,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: String,
        /// Owning user; the configured default when absent
        #[arg(short, long, env = "COGNITO_USER")]
        user: Option<String>,
    },

    /// Save one hypothesis of a session to your collection
    Save {
        /// Session id
        session_id: String,
        /// Hypothesis id, e.g. hyp_0
        hypothesis_id: String,
        /// Notes stored with the saved hypothesis
        #[arg(short, long, default_value = "")]
        notes: String,
        /// Owning user; the configured default when absent
        #[arg(short, long, env = "COGNITO_USER")]
        user: Option<String>,
    },

    /// List saved hypotheses, newest first
    Saved {
        /// Owning user; the configured default when absent
        #[arg(short, long, env = "COGNITO_USER")]
        user: Option<String>,
    },
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
