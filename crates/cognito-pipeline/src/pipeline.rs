//! Deterministic four-stage pipeline
//!
//! `START → EXTRACT → GAP_IDENTIFY → PAIR_AND_GENERATE → VALIDATE → DONE`,
//! with no branching and no stage-level retries. Stages run strictly one
//! after another; only the items inside a stage may fan out.

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::orchestrator::{Orchestrator, ProgressSink, SynthesisRequest};
use crate::state::{PipelineStage, StageUpdate, SynthesisState};
use async_trait::async_trait;
use cognito_domain::{LlmProvider, OrchestrationMode, SynthesisOutput};
use cognito_extractor::ConceptExtractor;
use cognito_gatekeeper::HypothesisValidator;
use cognito_synthesizer::{generate_pairs, GapIdentifier, HypothesisGenerator};
use std::sync::Arc;
use tracing::{debug, info};

/// The fixed-order orchestrator
pub struct DeterministicPipeline<L: LlmProvider> {
    extractor: ConceptExtractor<L>,
    gaps: GapIdentifier<L>,
    generator: HypothesisGenerator<L>,
    validator: HypothesisValidator<L>,
    top_pairs: usize,
}

impl<L: LlmProvider> DeterministicPipeline<L> {
    /// Build every stage over one shared provider
    pub fn new(llm: Arc<L>, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate().map_err(PipelineError::Config)?;
        Ok(Self {
            extractor: ConceptExtractor::new(Arc::clone(&llm), config.extractor),
            gaps: GapIdentifier::new(Arc::clone(&llm), config.synthesizer.clone()),
            generator: HypothesisGenerator::new(Arc::clone(&llm), config.synthesizer.clone()),
            validator: HypothesisValidator::new(llm, config.validation),
            top_pairs: config.synthesizer.top_pairs,
        })
    }

    /// Execute one stage against the current state
    async fn step(
        &self,
        state: &SynthesisState,
        request: &SynthesisRequest,
    ) -> StageUpdate {
        let focus = request.focus();
        match state.stage() {
            PipelineStage::Start => {
                let report = self.extractor.extract_all(&request.documents, focus).await;
                let degradations = report.degradation_notes();
                StageUpdate::Extracted {
                    concepts: report.concepts,
                    claims: report.claims,
                    degradations,
                }
            }
            PipelineStage::Extracted => {
                match self
                    .gaps
                    .try_identify(state.concepts(), state.claims(), focus)
                    .await
                {
                    Ok(gaps) => StageUpdate::GapsIdentified {
                        gaps,
                        degradations: Vec::new(),
                    },
                    Err(e) => StageUpdate::GapsIdentified {
                        gaps: Vec::new(),
                        degradations: vec![format!("gap identification failed: {}", e)],
                    },
                }
            }
            PipelineStage::GapsIdentified => {
                let pairs = generate_pairs(state.concepts(), self.top_pairs);
                debug!("Selected {} concept pairs", pairs.len());
                let report = self.generator.generate(&pairs, state.gaps(), focus).await;
                let degradations = report.degradation_notes();
                StageUpdate::HypothesesGenerated {
                    hypotheses: report.hypotheses,
                    degradations,
                }
            }
            PipelineStage::Generated | PipelineStage::Done => {
                let report = self
                    .validator
                    .validate(state.hypotheses().to_vec(), state.claims())
                    .await;
                StageUpdate::Validated {
                    hypotheses: report.hypotheses,
                    citations: report.citations,
                    degradations: report.degradations,
                }
            }
        }
    }
}

fn stage_message(state: &SynthesisState) -> String {
    match state.stage() {
        PipelineStage::Start => "Starting".to_string(),
        PipelineStage::Extracted => format!(
            "Extracted {} concepts and {} claims",
            state.concepts().len(),
            state.claims().len()
        ),
        PipelineStage::GapsIdentified => {
            format!("Identified {} research gaps", state.gaps().len())
        }
        PipelineStage::Generated => {
            format!("Generated {} hypotheses", state.hypotheses().len())
        }
        PipelineStage::Done => format!("Validated {} hypotheses", state.hypotheses().len()),
    }
}

#[async_trait]
impl<L: LlmProvider + 'static> Orchestrator for DeterministicPipeline<L> {
    fn mode(&self) -> OrchestrationMode {
        OrchestrationMode::Pipeline
    }

    async fn run(
        &self,
        request: &SynthesisRequest,
        progress: &dyn ProgressSink,
    ) -> Result<SynthesisOutput, PipelineError> {
        request.validate()?;
        info!(
            "Pipeline starting over {} documents",
            request.documents.len()
        );

        let mut state = SynthesisState::new();
        while state.stage() != PipelineStage::Done {
            let update = self.step(&state, request).await;
            state = state.apply(update)?;
            progress.report(
                state.stage().as_str(),
                state.stage().progress(),
                &stage_message(&state),
            );
        }

        info!(
            "Pipeline finished: {} hypotheses, {} degradations",
            state.hypotheses().len(),
            state.degradations().len()
        );
        Ok(state.into_output())
    }
}
