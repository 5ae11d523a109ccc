//! Cognito Domain Layer
//!
//! This crate contains the domain model for Cognito's hypothesis synthesis
//! pipeline and the trait interfaces that all other layers depend upon.
//! It carries no infrastructure code: LLM backends, literature search and
//! persistence live in other crates behind the traits defined here.
//!
//! ## Key Concepts
//!
//! - **Document**: clean text of one academic paper, provided by ingestion
//! - **Concept**: a named theory, method, finding or phenomenon from a document
//! - **Claim**: a specific assertion extracted from a document
//! - **Research Gap**: an under-explored area synthesized across documents
//! - **Hypothesis**: a scored, testable claim connecting two concepts
//! - **Citation**: a link from a hypothesis to a supporting claim
//! - **Task**: one asynchronous synthesis invocation tracked by id
//!
//! ## Invariants owned here
//!
//! - A hypothesis' confidence is always
//!   `0.35 * testability + 0.35 * novelty + 0.30 * significance`; the only way
//!   to change scores is [`Hypothesis::set_scores`], which recomputes it.
//! - Task status only moves forward (see [`TaskStatus::can_transition_to`]).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod agent;
pub mod citation;
pub mod claim;
pub mod concept;
pub mod confidence;
pub mod document;
pub mod gap;
pub mod hypothesis;
pub mod session;
pub mod task;
pub mod text;
pub mod traits;

// Re-exports for convenience
pub use agent::{AgentMessage, AgentRole, ToolInvocation};
pub use citation::Citation;
pub use claim::{Claim, ClaimId};
pub use concept::{Concept, ConceptType};
pub use confidence::{HypothesisScores, ScoreAdjustment};
pub use document::Document;
pub use gap::ResearchGap;
pub use hypothesis::{Hypothesis, HypothesisStatus};
pub use session::{
    OrchestrationMode, SavedHypothesis, SessionSummary, SynthesisOutput, SynthesisSession,
};
pub use task::{TaskId, TaskStatus};
pub use traits::{LiteratureSearch, LlmProvider, LlmRequest, PaperSummary, SessionStore};
