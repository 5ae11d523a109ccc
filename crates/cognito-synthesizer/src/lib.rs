//! Cognito Synthesizer
//!
//! The creative middle of the pipeline: from extracted concepts and claims
//! to candidate hypotheses.
//!
//! # Stages
//!
//! - [`GapIdentifier`]: one LLM call summarizing up to five research gaps.
//!   Never fails the pipeline; any error yields an empty list.
//! - [`pairs`]: pure, deterministic selection of cross-document or
//!   cross-domain concept pairs, scored by mean importance and capped at K.
//! - [`HypothesisGenerator`]: one creative LLM call per pair. A failing pair
//!   is recorded and skipped.
//!
//! Zero or one concept is a valid input: no pairs, no hypotheses, no error.

#![warn(missing_docs)]

mod config;
mod error;
mod gaps;
mod generator;
pub mod pairs;
mod prompt;

pub use config::SynthesizerConfig;
pub use error::SynthesizerError;
pub use gaps::{parse_gaps, GapIdentifier};
pub use generator::{parse_hypothesis, GenerationFailure, GenerationReport, HypothesisGenerator};
pub use pairs::{candidate_pairs, generate_pairs, ConceptPair};
