//! Cognito Extractor
//!
//! Turns the clean text of academic documents into structured concepts and
//! claims using a language model.
//!
//! # Architecture
//!
//! ```text
//! Document → excerpt → prompt → LLM → fence strip → JSON → Concepts + Claims
//! ```
//!
//! # Key Features
//!
//! - **Bounded excerpts**: only the first `max_excerpt_chars` characters of a
//!   document are sent
//! - **Per-document isolation**: a call error, timeout or unparseable reply
//!   for one document is recorded as a failure and the rest continue
//! - **Per-item leniency**: malformed concept or claim entries are skipped
//!   without discarding their siblings
//! - **Deterministic claim ids**: `{document_id}_claim_{index}`, where the
//!   index is the entry's position in the model's claim array
//! - **Ordered fan-out**: documents may be processed concurrently; results
//!   are recombined in input order
//!
//! # Example Usage
//!
//! ```no_run
//! use cognito_extractor::{ConceptExtractor, ExtractorConfig};
//! use cognito_domain::Document;
//! use cognito_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let llm = Arc::new(MockProvider::new(r#"{"concepts": [], "claims": []}"#));
//! let extractor = ConceptExtractor::new(llm, ExtractorConfig::default());
//!
//! let docs = vec![Document::new("p1", "A paper", "Some text")];
//! let report = extractor.extract_all(&docs, None).await;
//!
//! println!("Concepts: {}", report.concepts.len());
//! println!("Failures: {}", report.failures.len());
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;
mod types;

#[cfg(test)]
mod tests;

pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use extractor::ConceptExtractor;
pub use parser::parse_extraction;
pub use prompt::PromptBuilder;
pub use types::{DocumentExtraction, ExtractionFailure, ExtractionReport};
