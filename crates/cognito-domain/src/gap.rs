//! Research gaps synthesized across documents

use serde::{Deserialize, Serialize};

/// An under-explored area identified from the extracted concepts and claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchGap {
    /// Gap identifier (`gap_1`, `gap_2`, ... when the model omits one)
    pub id: String,
    /// Short title
    pub title: String,
    /// What is missing and why it matters
    pub description: String,
    /// Names of concepts the gap relates to
    pub related_concepts: Vec<String>,
    /// Importance in [0, 1]
    pub importance_score: f64,
    /// Ways the gap could be addressed
    pub suggested_approaches: Vec<String>,
}
