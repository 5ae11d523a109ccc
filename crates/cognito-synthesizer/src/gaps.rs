//! Research gap identification

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;
use crate::prompt::{build_gap_prompt, GAP_SYSTEM_PROMPT};
use cognito_domain::confidence::{clamp_unit, DEFAULT_SCORE};
use cognito_domain::{Claim, Concept, LlmProvider, LlmRequest, ResearchGap};
use cognito_llm::strip_code_fences;
use serde_json::Value;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Synthesizes research gaps from aggregated concepts and claims
pub struct GapIdentifier<L: LlmProvider> {
    llm: Arc<L>,
    config: SynthesizerConfig,
}

impl<L: LlmProvider> GapIdentifier<L> {
    /// Create a new gap identifier sharing `llm`
    pub fn new(llm: Arc<L>, config: SynthesizerConfig) -> Self {
        Self { llm, config }
    }

    /// Identify gaps, returning an empty list on any failure
    pub async fn identify(
        &self,
        concepts: &[Concept],
        claims: &[Claim],
        focus_area: Option<&str>,
    ) -> Vec<ResearchGap> {
        match self.try_identify(concepts, claims, focus_area).await {
            Ok(gaps) => gaps,
            Err(e) => {
                warn!("Gap identification failed, continuing without gaps: {}", e);
                Vec::new()
            }
        }
    }

    /// Identify gaps, surfacing the failure reason
    ///
    /// Only the first `max_gap_concepts` concepts and `max_gap_claims` claims
    /// are shown to the model. With nothing to show, no call is made.
    pub async fn try_identify(
        &self,
        concepts: &[Concept],
        claims: &[Claim],
        focus_area: Option<&str>,
    ) -> Result<Vec<ResearchGap>, SynthesizerError> {
        if concepts.is_empty() && claims.is_empty() {
            debug!("No concepts or claims; skipping gap identification");
            return Ok(Vec::new());
        }

        let concepts = &concepts[..concepts.len().min(self.config.max_gap_concepts)];
        let claims = &claims[..claims.len().min(self.config.max_gap_claims)];
        let prompt = build_gap_prompt(concepts, claims, self.config.gap_claim_chars, focus_area);

        let request = LlmRequest::new(prompt)
            .with_system(GAP_SYSTEM_PROMPT)
            .with_max_tokens(self.config.gap_max_tokens)
            .with_temperature(self.config.gap_temperature);

        let response = timeout(self.config.call_timeout(), self.llm.generate(&request))
            .await
            .map_err(|_| SynthesizerError::Timeout)?
            .map_err(|e| SynthesizerError::Llm(e.to_string()))?;

        let mut gaps = parse_gaps(&response)?;
        gaps.truncate(self.config.max_gaps);
        info!("Identified {} research gaps", gaps.len());
        Ok(gaps)
    }
}

/// Parse a gap reply: a JSON array, or an object with a `gaps` array
///
/// Entries without a title are skipped. Missing ids become `gap_{n}`
/// (1-based position in the reply).
pub fn parse_gaps(response: &str) -> Result<Vec<ResearchGap>, SynthesizerError> {
    let json: Value = serde_json::from_str(strip_code_fences(response))?;

    let items = match &json {
        Value::Array(items) => items,
        Value::Object(obj) => obj
            .get("gaps")
            .and_then(|v| v.as_array())
            .ok_or_else(|| SynthesizerError::InvalidFormat("Expected JSON array of gaps".to_string()))?,
        _ => {
            return Err(SynthesizerError::InvalidFormat(
                "Expected JSON array of gaps".to_string(),
            ))
        }
    };

    let mut gaps = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        match parse_gap(item, idx) {
            Ok(gap) => gaps.push(gap),
            Err(e) => warn!("Skipping gap {}: {}", idx, e),
        }
    }
    Ok(gaps)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_gap(json: &Value, idx: usize) -> Result<ResearchGap, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Gap is not a JSON object".to_string())?;

    let title = obj
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing or invalid 'title'".to_string())?
        .to_string();

    let id = obj
        .get("id")
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("gap_{}", idx + 1));

    Ok(ResearchGap {
        id,
        title,
        description: obj
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        related_concepts: string_list(obj.get("related_concepts")),
        importance_score: obj
            .get("importance_score")
            .and_then(|v| v.as_f64())
            .map(clamp_unit)
            .unwrap_or(DEFAULT_SCORE),
        suggested_approaches: string_list(obj.get("suggested_approaches")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cognito_domain::{ClaimId, ConceptType};
    use cognito_llm::MockProvider;

    fn concept(i: usize) -> Concept {
        Concept {
            name: format!("concept-{}", i),
            concept_type: ConceptType::Finding,
            description: "d".to_string(),
            domain: "x".to_string(),
            importance: None,
            source_paper_id: "p".to_string(),
            source_paper_title: "P".to_string(),
        }
    }

    fn claim(i: usize) -> Claim {
        Claim {
            id: ClaimId::for_document("p", i),
            text: format!("claim-text-{}", i),
            claim_type: "finding".to_string(),
            confidence: 0.5,
            source_paper_id: "p".to_string(),
            source_paper_title: "P".to_string(),
            page_reference: None,
        }
    }

    const SIX_GAPS: &str = r#"```json
[
  {"id": "gap_a", "title": "One", "importance_score": 0.9},
  {"title": "Two"},
  {"title": "Three"},
  {"description": "untitled"},
  {"title": "Four"},
  {"title": "Five"},
  {"title": "Six"}
]
```"#;

    #[test]
    fn test_parse_defaults() {
        let gaps = parse_gaps(SIX_GAPS).unwrap();
        assert_eq!(gaps.len(), 6);
        assert_eq!(gaps[0].id, "gap_a");
        assert_eq!(gaps[1].id, "gap_2");
        assert_eq!(gaps[1].importance_score, 0.5);
        assert_eq!(gaps[3].title, "Four");
    }

    #[test]
    fn test_parse_object_wrapper() {
        let gaps = parse_gaps(r#"{"gaps": [{"title": "Only"}]}"#).unwrap();
        assert_eq!(gaps.len(), 1);
    }

    #[tokio::test]
    async fn test_capped_at_max_gaps() {
        let llm = Arc::new(MockProvider::new(SIX_GAPS));
        let identifier = GapIdentifier::new(llm, SynthesizerConfig::default());
        let gaps = identifier.identify(&[concept(0)], &[], None).await;
        assert_eq!(gaps.len(), 5);
    }

    #[tokio::test]
    async fn test_failure_yields_empty_list() {
        let llm = Arc::new(MockProvider::new("no gaps here, sorry"));
        let identifier = GapIdentifier::new(Arc::clone(&llm), SynthesizerConfig::default());
        assert!(identifier.identify(&[concept(0)], &[], None).await.is_empty());

        llm.add_error("identify research gaps");
        assert!(identifier.identify(&[concept(0)], &[], None).await.is_empty());
        assert!(matches!(
            identifier.try_identify(&[concept(0)], &[], None).await,
            Err(SynthesizerError::Llm(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_input_skips_call() {
        let llm = Arc::new(MockProvider::new(SIX_GAPS));
        let identifier = GapIdentifier::new(Arc::clone(&llm), SynthesizerConfig::default());
        assert!(identifier.identify(&[], &[], None).await.is_empty());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prompt_caps_concepts_and_claims() {
        let llm = Arc::new(MockProvider::new("[]"));
        let identifier = GapIdentifier::new(Arc::clone(&llm), SynthesizerConfig::default());
        let concepts: Vec<_> = (0..40).map(concept).collect();
        let claims: Vec<_> = (0..25).map(claim).collect();

        identifier.identify(&concepts, &claims, Some("memory")).await;

        let request = &llm.calls()[0];
        assert!(request.prompt.contains("concept-29 "));
        assert!(!request.prompt.contains("concept-30 "));
        assert!(request.prompt.contains("claim-text-19\n"));
        assert!(!request.prompt.contains("claim-text-20"));
        assert_eq!(request.max_tokens, 2000);
    }
}
