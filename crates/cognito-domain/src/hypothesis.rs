//! Hypothesis module - the primary output of synthesis
//!
//! Scores and confidence are private so the weighted-confidence invariant
//! cannot be broken by field assignment. Deserialization goes through
//! [`HypothesisRecord`] and recomputes the confidence from the scores, so a
//! stored record with a stale confidence is corrected on load.

use crate::claim::ClaimId;
use crate::confidence::HypothesisScores;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a hypothesis through validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HypothesisStatus {
    /// Produced by the generator, not yet reviewed
    Generated,
    /// Reviewed and accepted
    Validated,
    /// Review failed or rejected; kept for the caller with that marker
    Unvalidated,
}

impl fmt::Display for HypothesisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HypothesisStatus::Generated => "generated",
            HypothesisStatus::Validated => "validated",
            HypothesisStatus::Unvalidated => "unvalidated",
        };
        f.write_str(s)
    }
}

/// A testable hypothesis connecting concepts from the corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HypothesisRecord", into = "HypothesisRecord")]
pub struct Hypothesis {
    /// Session-unique identifier
    pub id: String,
    /// One-line statement
    pub title: String,
    /// Full description
    pub description: String,
    /// Why the hypothesis follows from the source material
    pub rationale: String,
    /// Names of the concepts it connects
    pub source_concepts: Vec<String>,
    /// Claims cited as support; always ids extracted in the same session
    pub supporting_claims: Vec<ClaimId>,
    /// Suggested ways to test it
    pub methodology_hints: Vec<String>,
    /// Expected outcome if the hypothesis holds
    pub expected_outcome: Option<String>,
    /// Validator feedback, set during validation
    pub validation_feedback: Option<String>,
    /// Validation status
    pub status: HypothesisStatus,
    scores: HypothesisScores,
    confidence: f64,
}

impl Hypothesis {
    /// Create a freshly generated hypothesis with the given scores
    pub fn new(id: impl Into<String>, title: impl Into<String>, scores: HypothesisScores) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            rationale: String::new(),
            source_concepts: Vec::new(),
            supporting_claims: Vec::new(),
            methodology_hints: Vec::new(),
            expected_outcome: None,
            validation_feedback: None,
            status: HypothesisStatus::Generated,
            scores,
            confidence: scores.confidence(),
        }
    }

    /// Current scores
    pub fn scores(&self) -> HypothesisScores {
        self.scores
    }

    /// Weighted confidence derived from the scores
    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Replace the scores; confidence is recomputed
    pub fn set_scores(&mut self, scores: HypothesisScores) {
        self.scores = scores;
        self.confidence = scores.confidence();
    }
}

/// Serialized shape of a hypothesis
///
/// `confidence` is written for readers but ignored when reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypothesisRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    rationale: String,
    #[serde(default)]
    source_concepts: Vec<String>,
    #[serde(default)]
    supporting_claims: Vec<ClaimId>,
    #[serde(default)]
    methodology_hints: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected_outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validation_feedback: Option<String>,
    status: HypothesisStatus,
    testability_score: f64,
    novelty_score: f64,
    significance_score: f64,
    #[serde(default)]
    confidence_score: f64,
}

impl From<HypothesisRecord> for Hypothesis {
    fn from(record: HypothesisRecord) -> Self {
        let scores = HypothesisScores::new(
            record.testability_score,
            record.novelty_score,
            record.significance_score,
        );
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            rationale: record.rationale,
            source_concepts: record.source_concepts,
            supporting_claims: record.supporting_claims,
            methodology_hints: record.methodology_hints,
            expected_outcome: record.expected_outcome,
            validation_feedback: record.validation_feedback,
            status: record.status,
            scores,
            confidence: scores.confidence(),
        }
    }
}

impl From<Hypothesis> for HypothesisRecord {
    fn from(h: Hypothesis) -> Self {
        Self {
            id: h.id,
            title: h.title,
            description: h.description,
            rationale: h.rationale,
            source_concepts: h.source_concepts,
            supporting_claims: h.supporting_claims,
            methodology_hints: h.methodology_hints,
            expected_outcome: h.expected_outcome,
            validation_feedback: h.validation_feedback,
            status: h.status,
            testability_score: h.scores.testability(),
            novelty_score: h.scores.novelty(),
            significance_score: h.scores.significance(),
            confidence_score: h.confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_confidence() {
        let h = Hypothesis::new("hyp_0", "Title", HypothesisScores::new(0.8, 0.6, 0.4));
        assert!((h.confidence() - (0.28 + 0.21 + 0.12)).abs() < 1e-9);
        assert_eq!(h.status, HypothesisStatus::Generated);
    }

    #[test]
    fn test_set_scores_recomputes() {
        let mut h = Hypothesis::new("hyp_0", "Title", HypothesisScores::default());
        h.set_scores(HypothesisScores::new(1.0, 1.0, 1.0));
        assert!((h.confidence() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_ignores_stale_confidence() {
        let json = serde_json::json!({
            "id": "hyp_1",
            "title": "T",
            "status": "validated",
            "testability_score": 1.0,
            "novelty_score": 0.0,
            "significance_score": 0.0,
            "confidence_score": 0.99
        });
        let h: Hypothesis = serde_json::from_value(json).unwrap();
        assert!((h.confidence() - 0.35).abs() < 1e-9);
        assert_eq!(h.status, HypothesisStatus::Validated);
    }

    #[test]
    fn test_serialize_flat_scores() {
        let h = Hypothesis::new("hyp_2", "T", HypothesisScores::new(0.5, 0.5, 0.5));
        let value = serde_json::to_value(&h).unwrap();
        assert_eq!(value["testability_score"], 0.5);
        assert!((value["confidence_score"].as_f64().unwrap() - 0.5).abs() < 1e-9);
        assert!(value.get("validation_feedback").is_none());
    }
}
