//! Cognito Pipeline
//!
//! Sequences extraction, gap identification, pairing, generation and
//! validation into one synthesis run.
//!
//! # Architecture
//!
//! ```text
//! SynthesisRequest
//!     → Extracted { concepts, claims }
//!     → GapsIdentified { gaps }
//!     → HypothesesGenerated { hypotheses }
//!     → Validated { hypotheses, citations }
//!     → SynthesisOutput
//! ```
//!
//! Each arrow is a [`StageUpdate`] merged by [`SynthesisState::apply`].
//! Per-item failures inside a stage become degradation notes on the output;
//! only an empty request fails the run.
//!
//! The [`Orchestrator`] trait is the seam between this deterministic variant
//! and the agentic one, so task tracking can drive either.
//!
//! # Examples
//!
//! ```no_run
//! use cognito_domain::Document;
//! use cognito_llm::MockProvider;
//! use cognito_pipeline::{
//!     DeterministicPipeline, NoProgress, Orchestrator, PipelineConfig, SynthesisRequest,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = DeterministicPipeline::new(
//!     Arc::new(MockProvider::default()),
//!     PipelineConfig::default(),
//! )?;
//! let request = SynthesisRequest::new(
//!     vec![Document::new("p1", "Paper One", "Full text...")],
//!     Some("neuroplasticity".to_string()),
//! );
//! let output = pipeline.run(&request, &NoProgress).await?;
//! println!("{} hypotheses", output.hypotheses.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod orchestrator;
mod pipeline;
mod state;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use orchestrator::{NoProgress, Orchestrator, ProgressSink, SynthesisRequest};
pub use pipeline::DeterministicPipeline;
pub use state::{PipelineStage, StageUpdate, SynthesisState};
