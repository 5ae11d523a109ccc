//! Parsing of validation verdicts

use crate::error::ValidatorError;
use cognito_domain::ScoreAdjustment;
use cognito_llm::strip_code_fences;
use serde_json::Value;
use std::collections::HashMap;

/// The model's judgement of one hypothesis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationVerdict {
    /// Whether the hypothesis holds up; absent counts as false
    pub is_valid: bool,
    /// Free-text feedback
    pub feedback: Option<String>,
    /// Partial score adjustment
    pub adjustment: ScoreAdjustment,
    /// Claim ids offered as support, in reply order
    pub supporting_claim_ids: Vec<String>,
    /// Relevance per claim id
    pub relevance_scores: HashMap<String, f64>,
}

/// Parse a verdict reply
pub fn parse_verdict(response: &str) -> Result<ValidationVerdict, ValidatorError> {
    let json: Value = serde_json::from_str(strip_code_fences(response))?;
    let obj = json
        .as_object()
        .ok_or_else(|| ValidatorError::InvalidFormat("Expected JSON object".to_string()))?;

    let is_valid = match obj.get("is_valid") {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    };

    let feedback = obj
        .get("validation_feedback")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let adjustment = obj
        .get("adjusted_scores")
        .and_then(|v| v.as_object())
        .map(|scores| ScoreAdjustment {
            testability: scores.get("testability_score").and_then(|v| v.as_f64()),
            novelty: scores.get("novelty_score").and_then(|v| v.as_f64()),
            significance: scores.get("significance_score").and_then(|v| v.as_f64()),
        })
        .unwrap_or_default();

    let supporting_claim_ids = obj
        .get("supporting_claim_ids")
        .and_then(|v| v.as_array())
        .map(|ids| {
            ids.iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let relevance_scores = obj
        .get("relevance_scores")
        .and_then(|v| v.as_object())
        .map(|scores| {
            scores
                .iter()
                .filter_map(|(id, v)| v.as_f64().map(|score| (id.clone(), score)))
                .collect()
        })
        .unwrap_or_default();

    Ok(ValidationVerdict {
        is_valid,
        feedback,
        adjustment,
        supporting_claim_ids,
        relevance_scores,
    })
}
