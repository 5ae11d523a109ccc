//! Hypothesis validator

use crate::config::{InvalidPolicy, ValidationConfig};
use crate::error::ValidatorError;
use crate::prompt::{build_validation_prompt, SYSTEM_PROMPT};
use crate::verdict::{parse_verdict, ValidationVerdict};
use cognito_domain::confidence::{clamp_unit, DEFAULT_SCORE};
use cognito_domain::{Citation, Claim, Hypothesis, HypothesisStatus, LlmProvider, LlmRequest};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// How a single hypothesis came out of validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Accepted; carries the number of citations created
    Validated(usize),
    /// Judged invalid and kept as unvalidated
    Rejected,
    /// Judged invalid and removed
    Dropped,
    /// The call failed; kept as unvalidated
    Errored(String),
}

/// Result of validating a batch of hypotheses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    /// Surviving hypotheses, highest confidence first
    pub hypotheses: Vec<Hypothesis>,
    /// Citations for validated hypotheses
    pub citations: Vec<Citation>,
    /// Per-hypothesis outcome keyed by id, in input order
    pub outcomes: Vec<(String, ValidationOutcome)>,
    /// Notes for hypotheses whose validation call failed
    pub degradations: Vec<String>,
}

impl ValidationReport {
    /// Number of hypotheses accepted by the validator
    pub fn validated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| matches!(o, ValidationOutcome::Validated(_)))
            .count()
    }
}

/// Validates hypotheses against claims with one LLM call each
pub struct HypothesisValidator<L: LlmProvider> {
    llm: Arc<L>,
    config: ValidationConfig,
}

impl<L: LlmProvider> HypothesisValidator<L> {
    /// Create a new validator sharing `llm`
    pub fn new(llm: Arc<L>, config: ValidationConfig) -> Self {
        Self { llm, config }
    }

    /// Ask the model for a verdict on one hypothesis
    pub async fn judge(
        &self,
        hypothesis: &Hypothesis,
        claims: &[Claim],
    ) -> Result<ValidationVerdict, ValidatorError> {
        let request = LlmRequest::new(build_validation_prompt(hypothesis, claims))
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(self.config.max_tokens)
            .with_temperature(self.config.temperature);

        let response = timeout(self.config.call_timeout(), self.llm.generate(&request))
            .await
            .map_err(|_| ValidatorError::Timeout)?
            .map_err(|e| ValidatorError::Llm(e.to_string()))?;

        parse_verdict(&response)
    }

    /// Validate every hypothesis and sort the survivors by confidence
    ///
    /// Never fails: a failed call leaves that hypothesis `unvalidated`
    /// and adds a degradation note.
    pub async fn validate(&self, hypotheses: Vec<Hypothesis>, claims: &[Claim]) -> ValidationReport {
        let claim_index: HashMap<&str, &Claim> =
            claims.iter().map(|c| (c.id.as_str(), c)).collect();

        let judged: Vec<_> = stream::iter(hypotheses)
            .map(|hypothesis| async move {
                let verdict = self.judge(&hypothesis, claims).await;
                (hypothesis, verdict)
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut report = ValidationReport::default();
        for (mut hypothesis, verdict) in judged {
            let id = hypothesis.id.clone();
            let outcome = match verdict {
                Ok(verdict) => {
                    match apply_verdict(hypothesis, &verdict, &claim_index, self.config.invalid_policy)
                    {
                        Some((hypothesis, citations)) => {
                            let outcome = if hypothesis.status == HypothesisStatus::Validated {
                                ValidationOutcome::Validated(citations.len())
                            } else {
                                ValidationOutcome::Rejected
                            };
                            report.hypotheses.push(hypothesis);
                            report.citations.extend(citations);
                            outcome
                        }
                        None => ValidationOutcome::Dropped,
                    }
                }
                Err(e) => {
                    warn!("Validation of {} failed: {}", id, e);
                    hypothesis.status = HypothesisStatus::Unvalidated;
                    report.hypotheses.push(hypothesis);
                    report
                        .degradations
                        .push(format!("validation of {} failed: {}", id, e));
                    ValidationOutcome::Errored(e.to_string())
                }
            };
            debug!("{} -> {:?}", id, outcome);
            report.outcomes.push((id, outcome));
        }

        report
            .hypotheses
            .sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));

        info!(
            "Validated {} of {} hypotheses, {} citations",
            report.validated_count(),
            report.outcomes.len(),
            report.citations.len()
        );
        report
    }
}

/// Apply a verdict to a hypothesis
///
/// Returns `None` when the hypothesis is invalid and `policy` drops it.
/// Supporting claim ids are deduplicated and filtered to those present in
/// `claim_index`; one citation is created for each surviving id.
pub fn apply_verdict(
    mut hypothesis: Hypothesis,
    verdict: &ValidationVerdict,
    claim_index: &HashMap<&str, &Claim>,
    policy: InvalidPolicy,
) -> Option<(Hypothesis, Vec<Citation>)> {
    hypothesis.validation_feedback = verdict.feedback.clone();

    if !verdict.is_valid {
        return match policy {
            InvalidPolicy::RetainUnvalidated => {
                hypothesis.status = HypothesisStatus::Unvalidated;
                Some((hypothesis, Vec::new()))
            }
            InvalidPolicy::Drop => {
                debug!("Dropping invalid hypothesis {}", hypothesis.id);
                None
            }
        };
    }

    hypothesis.set_scores(hypothesis.scores().adjusted(&verdict.adjustment));
    hypothesis.status = HypothesisStatus::Validated;

    let mut seen = HashSet::new();
    let mut citations = Vec::new();
    let mut supporting = Vec::new();
    for raw_id in &verdict.supporting_claim_ids {
        if !seen.insert(raw_id.as_str()) {
            continue;
        }
        let Some(claim) = claim_index.get(raw_id.as_str()) else {
            debug!("{} cites unknown claim '{}'", hypothesis.id, raw_id);
            continue;
        };
        let relevance = verdict
            .relevance_scores
            .get(raw_id)
            .copied()
            .map(clamp_unit)
            .unwrap_or(DEFAULT_SCORE);
        supporting.push(claim.id.clone());
        citations.push(Citation {
            hypothesis_id: hypothesis.id.clone(),
            claim_id: claim.id.clone(),
            evidence_text: claim.text.clone(),
            source_paper_id: claim.source_paper_id.clone(),
            relevance_score: relevance,
        });
    }
    hypothesis.supporting_claims = supporting;

    Some((hypothesis, citations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cognito_domain::{ClaimId, HypothesisScores};
    use cognito_llm::MockProvider;

    fn claim(doc: &str, ordinal: usize, text: &str) -> Claim {
        Claim {
            id: ClaimId::for_document(doc, ordinal),
            text: text.to_string(),
            claim_type: "finding".to_string(),
            confidence: 0.8,
            source_paper_id: doc.to_string(),
            source_paper_title: format!("Paper {}", doc),
            page_reference: None,
        }
    }

    fn hypothesis(id: &str, title: &str, score: f64) -> Hypothesis {
        let mut h = Hypothesis::new(id, title, HypothesisScores::new(score, score, score));
        h.description = format!("{} description", title);
        h
    }

    fn validator(llm: MockProvider, config: ValidationConfig) -> HypothesisValidator<MockProvider> {
        HypothesisValidator::new(Arc::new(llm), config)
    }

    #[tokio::test]
    async fn test_one_valid_one_invalid_both_retained() {
        let llm = MockProvider::new("{}");
        llm.add_response(
            "Alpha link",
            r#"{"is_valid": true, "validation_feedback": "Well grounded",
                "adjusted_scores": {"testability_score": 0.9},
                "supporting_claim_ids": ["p1_claim_0"],
                "relevance_scores": {"p1_claim_0": 0.8}}"#,
        );
        llm.add_response(
            "Beta link",
            r#"{"is_valid": false, "validation_feedback": "Not testable"}"#,
        );
        let claims = vec![claim("p1", 0, "X raises Y")];

        let report = validator(llm, ValidationConfig::default())
            .validate(
                vec![
                    hypothesis("hyp_0", "Alpha link", 0.6),
                    hypothesis("hyp_1", "Beta link", 0.7),
                ],
                &claims,
            )
            .await;

        assert_eq!(report.hypotheses.len(), 2);
        assert!(report.degradations.is_empty());

        let alpha = report.hypotheses.iter().find(|h| h.id == "hyp_0").unwrap();
        assert_eq!(alpha.status, HypothesisStatus::Validated);
        assert_eq!(alpha.scores().testability(), 0.9);
        assert_eq!(alpha.scores().novelty(), 0.6);
        assert_eq!(alpha.confidence(), alpha.scores().confidence());
        assert_eq!(alpha.supporting_claims, vec![ClaimId::for_document("p1", 0)]);

        let beta = report.hypotheses.iter().find(|h| h.id == "hyp_1").unwrap();
        assert_eq!(beta.status, HypothesisStatus::Unvalidated);
        assert_eq!(beta.validation_feedback.as_deref(), Some("Not testable"));
        assert_eq!(beta.confidence(), 0.7);

        assert_eq!(report.citations.len(), 1);
        assert_eq!(report.citations[0].hypothesis_id, "hyp_0");
        assert_eq!(report.citations[0].evidence_text, "X raises Y");
        assert_eq!(report.citations[0].relevance_score, 0.8);
    }

    #[tokio::test]
    async fn test_drop_policy_removes_invalid() {
        let llm = MockProvider::new(r#"{"is_valid": false}"#);
        llm.add_response("Keeper", r#"{"is_valid": true}"#);

        let report = validator(llm, ValidationConfig::strict())
            .validate(
                vec![hypothesis("hyp_0", "Keeper", 0.5), hypothesis("hyp_1", "Loser", 0.5)],
                &[],
            )
            .await;

        assert_eq!(report.hypotheses.len(), 1);
        assert_eq!(report.hypotheses[0].id, "hyp_0");
        assert_eq!(report.outcomes[1], ("hyp_1".to_string(), ValidationOutcome::Dropped));
    }

    #[tokio::test]
    async fn test_unknown_and_duplicate_claim_ids_filtered() {
        let llm = MockProvider::new(
            r#"{"is_valid": true,
                "supporting_claim_ids": ["p1_claim_0", "ghost_claim_9", "p1_claim_0", "p2_claim_3"],
                "relevance_scores": {"p2_claim_3": 4.0}}"#,
        );
        let claims = vec![claim("p1", 0, "first"), claim("p2", 3, "second")];

        let report = validator(llm, ValidationConfig::default())
            .validate(vec![hypothesis("hyp_0", "Cited", 0.5)], &claims)
            .await;

        let ids: Vec<_> = report.citations.iter().map(|c| c.claim_id.as_str()).collect();
        assert_eq!(ids, vec!["p1_claim_0", "p2_claim_3"]);
        assert_eq!(report.citations[0].relevance_score, DEFAULT_SCORE);
        assert_eq!(report.citations[1].relevance_score, 1.0);
        assert_eq!(report.citations[1].source_paper_id, "p2");
        assert_eq!(report.hypotheses[0].supporting_claims.len(), 2);
    }

    #[tokio::test]
    async fn test_call_failure_keeps_hypothesis_unvalidated() {
        let llm = MockProvider::new(r#"{"is_valid": true}"#);
        llm.add_error("Broken");
        llm.add_response("Garbled", "not json at all");

        let report = validator(llm, ValidationConfig::strict())
            .validate(
                vec![
                    hypothesis("hyp_0", "Broken", 0.5),
                    hypothesis("hyp_1", "Garbled", 0.5),
                    hypothesis("hyp_2", "Fine", 0.5),
                ],
                &[],
            )
            .await;

        assert_eq!(report.hypotheses.len(), 3);
        assert_eq!(report.degradations.len(), 2);
        assert_eq!(report.validated_count(), 1);
        for h in &report.hypotheses {
            let expected = if h.id == "hyp_2" {
                HypothesisStatus::Validated
            } else {
                HypothesisStatus::Unvalidated
            };
            assert_eq!(h.status, expected, "{}", h.id);
        }
    }

    #[tokio::test]
    async fn test_sorted_by_confidence_descending() {
        let llm = MockProvider::new(r#"{"is_valid": true}"#);
        llm.add_response("Low", r#"{"is_valid": true, "adjusted_scores": {"novelty_score": 0.1}}"#);

        let report = validator(llm, ValidationConfig::default())
            .validate(
                vec![
                    hypothesis("hyp_0", "Low", 0.5),
                    hypothesis("hyp_1", "Mid", 0.5),
                    hypothesis("hyp_2", "High", 0.9),
                ],
                &[],
            )
            .await;

        let order: Vec<_> = report.hypotheses.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(order, vec!["hyp_2", "hyp_1", "hyp_0"]);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let llm = MockProvider::new("{}");
        let counter = llm.clone();
        let report = validator(llm, ValidationConfig::default()).validate(Vec::new(), &[]).await;
        assert!(report.hypotheses.is_empty());
        assert_eq!(counter.call_count(), 0);
    }
}
