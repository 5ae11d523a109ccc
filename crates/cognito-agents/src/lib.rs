//! Cognito Agents
//!
//! Agentic synthesis: a supervisor routes control through four roles, each
//! backed by the language model and a small set of research tools.
//!
//! # Architecture
//!
//! ```text
//! start → research → analyze → generate → critique → END
//!             ↓          ↓          ↓          ↓
//!          (error) ──────┴──────────┴──────────┴──→ END
//! ```
//!
//! - **research**: literature search and a novelty estimate for the focus area
//! - **analyze**: concept and claim extraction, shared with the pipeline
//! - **generate**: one call that proposes several hypotheses, parsed from
//!   `HYPOTHESIS n:` markers or line boundaries
//! - **critique**: tool-based review that rescores and orders the hypotheses
//!
//! Every role appends one message to the run transcript and every tool call
//! is logged with its role. Unlike the deterministic pipeline this variant
//! does not produce citations.

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
pub mod parse;
mod prompt;
mod state;
mod supervisor;
pub mod tools;
mod transcript;

pub use config::{AgentsConfig, SearchConfig};
pub use error::{AgentError, ToolError};
pub use orchestrator::AgenticOrchestrator;
pub use parse::{parse_hypotheses, HypothesisParse, ParseStrategy, ParsedHypothesis};
pub use state::AgenticState;
pub use supervisor::{route, AgentStep, Route};
pub use tools::{MockSearch, SemanticScholarClient, ToolKit};
pub use transcript::Transcript;
