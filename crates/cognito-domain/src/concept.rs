//! Concepts extracted from documents

use crate::confidence::DEFAULT_SCORE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of concept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptType {
    /// An explanatory framework
    Theory,
    /// A technique or procedure
    Method,
    /// A reported result
    Finding,
    /// An observed effect
    Phenomenon,
}

impl ConceptType {
    /// Parse a concept type label, case-insensitively
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "theory" => Some(ConceptType::Theory),
            "method" => Some(ConceptType::Method),
            "finding" => Some(ConceptType::Finding),
            "phenomenon" => Some(ConceptType::Phenomenon),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ConceptType::Theory => "theory",
            ConceptType::Method => "method",
            ConceptType::Finding => "finding",
            ConceptType::Phenomenon => "phenomenon",
        }
    }
}

impl fmt::Display for ConceptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named idea extracted from one document
///
/// Concepts are never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// Concept name
    pub name: String,

    /// Kind of concept
    #[serde(rename = "type")]
    pub concept_type: ConceptType,

    /// Short description
    pub description: String,

    /// Field of study
    pub domain: String,

    /// Importance in [0, 1], absent when the model did not provide one
    pub importance: Option<f64>,

    /// Document the concept came from
    pub source_paper_id: String,

    /// Title of that document
    pub source_paper_title: String,
}

impl Concept {
    /// Importance, falling back to 0.5 when absent
    pub fn importance_or_default(&self) -> f64 {
        self.importance.unwrap_or(DEFAULT_SCORE)
    }

    /// Domain label normalized for comparisons
    pub fn normalized_domain(&self) -> String {
        self.domain.trim().to_lowercase()
    }
}
