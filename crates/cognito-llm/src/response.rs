//! Cleanup and parsing of raw model replies

use crate::LlmError;
use serde::de::DeserializeOwned;

/// Strip a surrounding Markdown code fence from a model reply
///
/// Handles a leading fence with an optional `json` language tag (any case)
/// and a trailing fence. Text without fences is returned trimmed.
///
/// # Examples
///
/// ```
/// use cognito_llm::strip_code_fences;
///
/// assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
/// assert_eq!(strip_code_fences("  {\"a\":1} "), "{\"a\":1}");
/// ```
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest;
        if let Some(rest) = text
            .get(..4)
            .filter(|tag| tag.eq_ignore_ascii_case("json"))
            .and_then(|_| text.get(4..))
        {
            text = rest;
        }
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}

/// Parse a reply as an untyped JSON value after fence stripping
pub fn parse_json_value(raw: &str) -> Result<serde_json::Value, LlmError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse JSON: {}", e)))
}

/// Parse a reply into `T` after fence stripping
pub fn parse_json<T: DeserializeOwned>(raw: &str) -> Result<T, LlmError> {
    serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse JSON: {}", e)))
}
