//! Cognito Gatekeeper
//!
//! Validates generated hypotheses against the session's claims and links
//! citations.
//!
//! For each hypothesis one LLM call returns a verdict: validity, feedback,
//! partially adjusted scores, supporting claim ids and per-claim relevance.
//!
//! - **Valid**: scores are merged (omitted fields keep their prior value),
//!   confidence is recomputed, status becomes `validated`, and one citation
//!   is created per supporting claim id that exists in the session.
//!   Unknown ids are dropped, so no citation ever dangles.
//! - **Invalid**: under [`InvalidPolicy::RetainUnvalidated`] (default) the
//!   hypothesis is kept with status `unvalidated`; under
//!   [`InvalidPolicy::Drop`] it is removed.
//! - **Call error or unparseable verdict**: always kept as `unvalidated`.
//!
//! Output is sorted by confidence, highest first.
//!
//! # Examples
//!
//! ```no_run
//! use cognito_gatekeeper::{HypothesisValidator, ValidationConfig};
//! use cognito_llm::MockProvider;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let validator = HypothesisValidator::new(
//!     Arc::new(MockProvider::new(r#"{"is_valid": true}"#)),
//!     ValidationConfig::default(),
//! );
//! let report = validator.validate(Vec::new(), &[]).await;
//! assert!(report.hypotheses.is_empty());
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod prompt;
mod validator;
mod verdict;

pub use config::{InvalidPolicy, ValidationConfig};
pub use error::ValidatorError;
pub use validator::{
    apply_verdict, HypothesisValidator, ValidationOutcome, ValidationReport,
};
pub use verdict::{parse_verdict, ValidationVerdict};
