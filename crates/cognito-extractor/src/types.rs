//! Result types for extraction

use cognito_domain::{Claim, Concept};
use serde::{Deserialize, Serialize};

/// Concepts and claims extracted from one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentExtraction {
    /// Extracted concepts
    pub concepts: Vec<Concept>,
    /// Extracted claims, with deterministic ids
    pub claims: Vec<Claim>,
    /// Entries of the reply that were skipped as malformed
    pub skipped_entries: usize,
}

/// A document that contributed nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Document id
    pub document_id: String,
    /// Why it failed
    pub reason: String,
}

/// Aggregated extraction over a batch of documents, in input order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    /// All concepts, grouped by document in input order
    pub concepts: Vec<Concept>,
    /// All claims, grouped by document in input order
    pub claims: Vec<Claim>,
    /// Documents that failed
    pub failures: Vec<ExtractionFailure>,
    /// Documents that succeeded
    pub documents_succeeded: usize,
}

impl ExtractionReport {
    /// Human-readable notes for each failed document
    pub fn degradation_notes(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| format!("extraction of document {} failed: {}", f.document_id, f.reason))
            .collect()
    }
}
