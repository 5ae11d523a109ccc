//! Claim module - specific assertions extracted from documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a claim, unique within one synthesis session
///
/// Claim ids are deterministic: `{document_id}_claim_{ordinal}`, so the same
/// documents always produce the same ids and citations stay reproducible.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    /// Derive the id of the `ordinal`-th claim of a document
    ///
    /// # Examples
    ///
    /// ```
    /// use cognito_domain::ClaimId;
    ///
    /// let id = ClaimId::for_document("paper42", 3);
    /// assert_eq!(id.as_str(), "paper42_claim_3");
    /// ```
    pub fn for_document(document_id: &str, ordinal: usize) -> Self {
        Self(format!("{}_claim_{}", document_id, ordinal))
    }

    /// Wrap a raw id string (e.g. one echoed back by the language model)
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A claim extracted from a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    /// Deterministic identifier
    pub id: ClaimId,

    /// The assertion itself
    pub text: String,

    /// Kind of claim (finding, method, theory, observation)
    pub claim_type: String,

    /// Extraction confidence in [0, 1]
    pub confidence: f64,

    /// Document the claim came from
    pub source_paper_id: String,

    /// Title of that document
    pub source_paper_title: String,

    /// Page or section reference, when identifiable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_id_format() {
        assert_eq!(ClaimId::for_document("doc", 0).to_string(), "doc_claim_0");
    }

    #[test]
    fn test_claim_id_serializes_as_string() {
        let id = ClaimId::for_document("doc", 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"doc_claim_7\"");
    }

    #[test]
    fn test_distinct_documents_distinct_ids() {
        assert_ne!(ClaimId::for_document("a", 1), ClaimId::for_document("b", 1));
    }
}
