//! Hypothesis generation, one LLM call per concept pair

use crate::config::SynthesizerConfig;
use crate::error::SynthesizerError;
use crate::pairs::ConceptPair;
use crate::prompt::{build_generation_prompt, GENERATION_SYSTEM_PROMPT};
use cognito_domain::confidence::DEFAULT_SCORE;
use cognito_domain::{Hypothesis, HypothesisScores, LlmProvider, LlmRequest, ResearchGap};
use cognito_llm::strip_code_fences;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// A pair whose hypothesis could not be generated
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationFailure {
    /// Names of the two concepts
    pub concepts: [String; 2],
    /// Why generation failed
    pub reason: String,
}

/// Hypotheses generated for a batch of pairs, in pair order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    /// Successfully generated hypotheses
    pub hypotheses: Vec<Hypothesis>,
    /// Pairs that failed
    pub failures: Vec<GenerationFailure>,
}

impl GenerationReport {
    /// Human-readable notes for each failed pair
    pub fn degradation_notes(&self) -> Vec<String> {
        self.failures
            .iter()
            .map(|f| {
                format!(
                    "hypothesis generation for '{}' x '{}' failed: {}",
                    f.concepts[0], f.concepts[1], f.reason
                )
            })
            .collect()
    }
}

/// Generates one hypothesis per concept pair
pub struct HypothesisGenerator<L: LlmProvider> {
    llm: Arc<L>,
    config: SynthesizerConfig,
}

impl<L: LlmProvider> HypothesisGenerator<L> {
    /// Create a new generator sharing `llm`
    pub fn new(llm: Arc<L>, config: SynthesizerConfig) -> Self {
        Self { llm, config }
    }

    /// Generate the hypothesis for the pair at position `index`
    ///
    /// The hypothesis id is `hyp_{index}`.
    pub async fn generate_one(
        &self,
        pair: &ConceptPair<'_>,
        index: usize,
        gaps: &[ResearchGap],
        focus_area: Option<&str>,
    ) -> Result<Hypothesis, SynthesizerError> {
        let prompt = build_generation_prompt(pair, gaps, focus_area);
        let request = LlmRequest::new(prompt)
            .with_system(GENERATION_SYSTEM_PROMPT)
            .with_max_tokens(self.config.generation_max_tokens)
            .with_temperature(self.config.generation_temperature);

        let response = timeout(self.config.call_timeout(), self.llm.generate(&request))
            .await
            .map_err(|_| SynthesizerError::Timeout)?
            .map_err(|e| SynthesizerError::Llm(e.to_string()))?;

        let mut hypothesis = parse_hypothesis(&response, format!("hyp_{}", index))?;
        hypothesis.source_concepts = pair.names().to_vec();
        debug!(
            "Generated {} ({:.2}) from '{}' x '{}'",
            hypothesis.id,
            hypothesis.confidence(),
            pair.first.name,
            pair.second.name
        );
        Ok(hypothesis)
    }

    /// Generate for every pair, isolating failures per pair
    ///
    /// Pairs may be processed concurrently; output keeps pair order.
    pub async fn generate(
        &self,
        pairs: &[ConceptPair<'_>],
        gaps: &[ResearchGap],
        focus_area: Option<&str>,
    ) -> GenerationReport {
        let results: Vec<_> = stream::iter(0..pairs.len())
            .map(|index| {
                let pair = &pairs[index];
                async move { (pair, self.generate_one(pair, index, gaps, focus_area).await) }
            })
            .buffered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut report = GenerationReport::default();
        for (pair, result) in results {
            match result {
                Ok(hypothesis) => report.hypotheses.push(hypothesis),
                Err(e) => {
                    warn!(
                        "Skipping pair '{}' x '{}': {}",
                        pair.first.name, pair.second.name, e
                    );
                    report.failures.push(GenerationFailure {
                        concepts: pair.names(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Generated {} hypotheses from {} pairs",
            report.hypotheses.len(),
            pairs.len()
        );
        report
    }
}

/// Parse a generation reply into a hypothesis with the given id
///
/// `title` is required. Missing scores count as 0.5 and out-of-range
/// scores are clamped; confidence is derived from the scores.
pub fn parse_hypothesis(response: &str, id: String) -> Result<Hypothesis, SynthesizerError> {
    let json: Value = serde_json::from_str(strip_code_fences(response))?;
    let obj = json
        .as_object()
        .ok_or_else(|| SynthesizerError::InvalidFormat("Expected JSON object".to_string()))?;

    let text = |key: &str| -> Option<String> {
        obj.get(key)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let score = |key: &str| obj.get(key).and_then(|v| v.as_f64()).unwrap_or(DEFAULT_SCORE);

    let title = text("title")
        .ok_or_else(|| SynthesizerError::InvalidFormat("Missing or invalid 'title'".to_string()))?;

    let scores = HypothesisScores::new(
        score("testability_score"),
        score("novelty_score"),
        score("significance_score"),
    );

    let mut hypothesis = Hypothesis::new(id, title, scores);
    hypothesis.description = text("description").unwrap_or_default();
    hypothesis.rationale = text("rationale").unwrap_or_default();
    hypothesis.expected_outcome = text("expected_outcome");
    hypothesis.methodology_hints = obj
        .get("methodology_hints")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(hypothesis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairs::generate_pairs;
    use cognito_domain::{Concept, ConceptType, HypothesisStatus};
    use cognito_llm::MockProvider;
    use std::time::Duration;

    const REPLY: &str = r#"```json
{
    "title": "Sleep spindles gate working memory consolidation",
    "description": "desc",
    "rationale": "why",
    "methodology_hints": ["EEG", "dual-task"],
    "testability_score": 0.8,
    "novelty_score": 0.6,
    "significance_score": 0.4
}
```"#;

    fn concept(name: &str, paper: &str) -> Concept {
        Concept {
            name: name.to_string(),
            concept_type: ConceptType::Phenomenon,
            description: "d".to_string(),
            domain: "x".to_string(),
            importance: None,
            source_paper_id: paper.to_string(),
            source_paper_title: paper.to_string(),
        }
    }

    #[test]
    fn test_parse_hypothesis_confidence() {
        let h = parse_hypothesis(REPLY, "hyp_0".to_string()).unwrap();
        assert_eq!(h.status, HypothesisStatus::Generated);
        assert!(h.supporting_claims.is_empty());
        assert!((h.confidence() - (0.35 * 0.8 + 0.35 * 0.6 + 0.30 * 0.4)).abs() < 1e-9);
        assert_eq!(h.methodology_hints, vec!["EEG", "dual-task"]);
    }

    #[test]
    fn test_missing_scores_default() {
        let h = parse_hypothesis(r#"{"title": "T"}"#, "hyp_1".to_string()).unwrap();
        assert!((h.confidence() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_missing_title_fails() {
        assert!(parse_hypothesis(r#"{"description": "x"}"#, "hyp_1".to_string()).is_err());
    }

    #[tokio::test]
    async fn test_generate_isolates_pair_failures() {
        let llm = MockProvider::new(REPLY);
        llm.add_error("Name: Broken");
        let concepts = vec![
            concept("A", "p1"),
            concept("B", "p2"),
            concept("Broken", "p3"),
        ];
        let pairs = generate_pairs(&concepts, 5);
        assert_eq!(pairs.len(), 3);

        let generator = HypothesisGenerator::new(Arc::new(llm), SynthesizerConfig::default());
        let report = generator.generate(&pairs, &[], None).await;

        assert_eq!(report.hypotheses.len(), 1);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.hypotheses[0].id, "hyp_0");
        assert_eq!(report.hypotheses[0].source_concepts, vec!["A", "B"]);
        assert_eq!(report.degradation_notes().len(), 2);
    }

    #[tokio::test]
    async fn test_elevated_temperature() {
        let llm = Arc::new(MockProvider::new(REPLY));
        let concepts = vec![concept("A", "p1"), concept("B", "p2")];
        let pairs = generate_pairs(&concepts, 5);
        let generator = HypothesisGenerator::new(Arc::clone(&llm), SynthesizerConfig::default());

        generator.generate(&pairs, &[], None).await;

        let request = &llm.calls()[0];
        assert_eq!(request.temperature, 0.8);
        assert_eq!(request.max_tokens, 1500);
    }

    #[tokio::test]
    async fn test_concurrent_generation_on_spawned_task_keeps_pair_order() {
        let llm = MockProvider::new(REPLY);
        llm.add_delayed("Name: A", Duration::from_millis(30), REPLY);
        let generator = Arc::new(HypothesisGenerator::new(
            Arc::new(llm),
            SynthesizerConfig {
                concurrency: 3,
                ..SynthesizerConfig::default()
            },
        ));

        let report = tokio::spawn(async move {
            let concepts = vec![concept("A", "p1"), concept("B", "p2"), concept("C", "p3")];
            let pairs = generate_pairs(&concepts, 5);
            generator.generate(&pairs, &[], None).await
        })
        .await
        .unwrap();

        let ids: Vec<_> = report.hypotheses.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["hyp_0", "hyp_1", "hyp_2"]);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_zero_pairs_zero_calls() {
        let llm = Arc::new(MockProvider::new(REPLY));
        let generator = HypothesisGenerator::new(Arc::clone(&llm), SynthesizerConfig::default());
        let report = generator.generate(&[], &[], None).await;
        assert!(report.hypotheses.is_empty());
        assert_eq!(llm.call_count(), 0);
    }
}
