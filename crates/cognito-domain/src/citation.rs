//! Citations link hypotheses to the claims that support them

use crate::claim::ClaimId;
use serde::{Deserialize, Serialize};

/// A link from a hypothesis to one supporting claim
///
/// `claim_id` always refers to a claim extracted in the same session; the
/// validator drops ids it cannot resolve before a citation is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Hypothesis being supported
    pub hypothesis_id: String,
    /// Supporting claim
    pub claim_id: ClaimId,
    /// Text of the claim, copied for display
    pub evidence_text: String,
    /// Document the claim came from
    pub source_paper_id: String,
    /// Relevance in [0, 1]
    pub relevance_score: f64,
}
