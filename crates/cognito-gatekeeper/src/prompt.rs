//! Validation prompt

use cognito_domain::{Claim, Hypothesis};

pub(crate) const SYSTEM_PROMPT: &str =
    "You are a rigorous research validator skilled at evaluating hypotheses.";

pub(crate) fn build_validation_prompt(hypothesis: &Hypothesis, claims: &[Claim]) -> String {
    let claims_text = if claims.is_empty() {
        "(no claims available)".to_string()
    } else {
        claims
            .iter()
            .map(|c| format!("[{}] {}", c.id, c.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Validate this research hypothesis and find supporting evidence from the claims.\n\n\
         HYPOTHESIS:\nTitle: {}\nDescription: {}\n\n\
         AVAILABLE CLAIMS FROM PAPERS:\n{}\n\n\
         Evaluate the hypothesis and find supporting claims.\n\n{}",
        hypothesis.title, hypothesis.description, claims_text, OUTPUT_FORMAT
    )
}

const OUTPUT_FORMAT: &str = r#"Return a JSON object:
{
    "is_valid": true/false,
    "validation_feedback": "Brief feedback on the hypothesis quality",
    "adjusted_scores": {
        "testability_score": 0.0-1.0,
        "novelty_score": 0.0-1.0,
        "significance_score": 0.0-1.0
    },
    "supporting_claim_ids": ["claim_id1", "claim_id2"],
    "relevance_scores": {
        "claim_id1": 0.0-1.0,
        "claim_id2": 0.0-1.0
    }
}

Return ONLY valid JSON."#;
