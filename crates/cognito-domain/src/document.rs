//! Documents are the read-only input of a synthesis session

use crate::text::truncate_chars;
use serde::{Deserialize, Serialize};

/// One academic document, already converted to clean text by ingestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned by the ingestion collaborator
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Extracted full text
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }

    /// A document is usable when it has non-blank text
    pub fn is_usable(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Bounded excerpt of the text sent to the language model
    pub fn excerpt(&self, max_chars: usize) -> &str {
        truncate_chars(&self.text, max_chars)
    }
}
