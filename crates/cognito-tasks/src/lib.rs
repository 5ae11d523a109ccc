//! Cognito Tasks
//!
//! Background execution and status tracking for synthesis runs.
//!
//! A submitted task gets an id immediately and runs on the Tokio runtime.
//! Callers poll by id for status, progress and the current step, then fetch
//! the result or the recorded error. Every terminal outcome is written to
//! the session store, and a poll the in-memory registry cannot answer is
//! answered from there. Only an id unknown to both polls as
//! [`TaskPoll::Expired`].
//!
//! # Examples
//!
//! ```no_run
//! use cognito_domain::Document;
//! use cognito_llm::MockProvider;
//! use cognito_pipeline::{DeterministicPipeline, PipelineConfig};
//! use cognito_store::MemorySessionStore;
//! use cognito_tasks::{SubmitRequest, TaskPoll, TaskTracker, TrackerConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = TaskTracker::new(Arc::new(MemorySessionStore::new()), TrackerConfig::default())?;
//! let pipeline = DeterministicPipeline::new(Arc::new(MockProvider::default()), PipelineConfig::default())?;
//!
//! let task_id = tracker.submit(
//!     Arc::new(pipeline),
//!     SubmitRequest {
//!         documents: vec![Document::new("p1", "Paper One", "Full text...")],
//!         focus_area: None,
//!         user_id: None,
//!     },
//! );
//! if let TaskPoll::Found(snapshot) = tracker.poll(task_id).await? {
//!     println!("{}: {:.0}%", snapshot.status, snapshot.progress * 100.0);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod snapshot;
mod tracker;

pub use config::TrackerConfig;
pub use error::TaskError;
pub use snapshot::{TaskOutcome, TaskPoll, TaskSnapshot};
pub use tracker::{SubmitRequest, TaskTracker};
