//! Typed synthesis state and its single merge combinator
//!
//! Each stage hands back a [`StageUpdate`] carrying only the fields it
//! owns. [`SynthesisState::apply`] is the one place those fields are
//! written; every other field passes through untouched and degradation
//! notes only ever accumulate.

use crate::error::PipelineError;
use cognito_domain::{Citation, Claim, Concept, Hypothesis, ResearchGap, SynthesisOutput};

/// Position in the fixed stage sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum PipelineStage {
    /// Nothing done yet
    #[default]
    Start,
    /// Concepts and claims extracted
    Extracted,
    /// Research gaps identified
    GapsIdentified,
    /// Pairs scored and hypotheses generated
    Generated,
    /// Hypotheses validated; the run is done
    Done,
}

impl PipelineStage {
    /// Label used in progress reports
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Start => "start",
            PipelineStage::Extracted => "extract",
            PipelineStage::GapsIdentified => "gap_identify",
            PipelineStage::Generated => "pair_and_generate",
            PipelineStage::Done => "validate",
        }
    }

    /// Fraction of the run completed once this stage is reached
    pub fn progress(&self) -> f64 {
        match self {
            PipelineStage::Start => 0.0,
            PipelineStage::Extracted => 0.25,
            PipelineStage::GapsIdentified => 0.5,
            PipelineStage::Generated => 0.75,
            PipelineStage::Done => 1.0,
        }
    }
}

/// The contribution of one stage
#[derive(Debug, Clone, PartialEq)]
pub enum StageUpdate {
    /// Output of extraction
    Extracted {
        /// Concepts in document order
        concepts: Vec<Concept>,
        /// Claims in document order
        claims: Vec<Claim>,
        /// Failed documents
        degradations: Vec<String>,
    },
    /// Output of gap identification
    GapsIdentified {
        /// Identified gaps, possibly empty
        gaps: Vec<ResearchGap>,
        /// Set when identification failed
        degradations: Vec<String>,
    },
    /// Output of pairing and generation
    HypothesesGenerated {
        /// Generated hypotheses in pair order
        hypotheses: Vec<Hypothesis>,
        /// Failed pairs
        degradations: Vec<String>,
    },
    /// Output of validation
    Validated {
        /// Hypotheses after validation, replacing the generated ones
        hypotheses: Vec<Hypothesis>,
        /// Citations linking hypotheses to claims
        citations: Vec<Citation>,
        /// Hypotheses whose validation failed
        degradations: Vec<String>,
    },
}

impl StageUpdate {
    fn name(&self) -> &'static str {
        match self {
            StageUpdate::Extracted { .. } => "extracted",
            StageUpdate::GapsIdentified { .. } => "gaps_identified",
            StageUpdate::HypothesesGenerated { .. } => "hypotheses_generated",
            StageUpdate::Validated { .. } => "validated",
        }
    }

    fn requires(&self) -> PipelineStage {
        match self {
            StageUpdate::Extracted { .. } => PipelineStage::Start,
            StageUpdate::GapsIdentified { .. } => PipelineStage::Extracted,
            StageUpdate::HypothesesGenerated { .. } => PipelineStage::GapsIdentified,
            StageUpdate::Validated { .. } => PipelineStage::Generated,
        }
    }
}

/// Accumulated state of one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisState {
    stage: PipelineStage,
    concepts: Vec<Concept>,
    claims: Vec<Claim>,
    gaps: Vec<ResearchGap>,
    hypotheses: Vec<Hypothesis>,
    citations: Vec<Citation>,
    degradations: Vec<String>,
}

impl SynthesisState {
    /// Fresh state at [`PipelineStage::Start`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one stage's contribution, producing the next state
    ///
    /// Updates must arrive in stage order; anything else is rejected.
    pub fn apply(self, update: StageUpdate) -> Result<Self, PipelineError> {
        if update.requires() != self.stage {
            return Err(PipelineError::OutOfOrder {
                current: self.stage.as_str(),
                update: update.name(),
            });
        }

        let mut next = self;
        match update {
            StageUpdate::Extracted {
                concepts,
                claims,
                degradations,
            } => {
                next.stage = PipelineStage::Extracted;
                next.concepts = concepts;
                next.claims = claims;
                next.degradations.extend(degradations);
            }
            StageUpdate::GapsIdentified { gaps, degradations } => {
                next.stage = PipelineStage::GapsIdentified;
                next.gaps = gaps;
                next.degradations.extend(degradations);
            }
            StageUpdate::HypothesesGenerated {
                hypotheses,
                degradations,
            } => {
                next.stage = PipelineStage::Generated;
                next.hypotheses = hypotheses;
                next.degradations.extend(degradations);
            }
            StageUpdate::Validated {
                hypotheses,
                citations,
                degradations,
            } => {
                next.stage = PipelineStage::Done;
                next.hypotheses = hypotheses;
                next.citations = citations;
                next.degradations.extend(degradations);
            }
        }
        Ok(next)
    }

    /// Current stage
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Extracted concepts
    pub fn concepts(&self) -> &[Concept] {
        &self.concepts
    }

    /// Extracted claims
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Identified gaps
    pub fn gaps(&self) -> &[ResearchGap] {
        &self.gaps
    }

    /// Current hypotheses
    pub fn hypotheses(&self) -> &[Hypothesis] {
        &self.hypotheses
    }

    /// Notes accumulated so far
    pub fn degradations(&self) -> &[String] {
        &self.degradations
    }

    /// Convert into the run's output
    pub fn into_output(self) -> SynthesisOutput {
        SynthesisOutput {
            hypotheses: self.hypotheses,
            research_gaps: self.gaps,
            concepts: self.concepts,
            claims: self.claims,
            citations: self.citations,
            degradations: self.degradations,
            ..SynthesisOutput::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cognito_domain::{ConceptType, HypothesisScores};

    fn concept(name: &str) -> Concept {
        Concept {
            name: name.to_string(),
            concept_type: ConceptType::Theory,
            description: String::new(),
            domain: "physics".to_string(),
            importance: None,
            source_paper_id: "p1".to_string(),
            source_paper_title: "P1".to_string(),
        }
    }

    fn extracted() -> StageUpdate {
        StageUpdate::Extracted {
            concepts: vec![concept("Entropy")],
            claims: Vec::new(),
            degradations: vec!["doc p2 failed".to_string()],
        }
    }

    #[test]
    fn test_updates_leave_other_fields_untouched() {
        let state = SynthesisState::new().apply(extracted()).unwrap();
        let state = state
            .apply(StageUpdate::GapsIdentified {
                gaps: Vec::new(),
                degradations: vec!["gaps failed".to_string()],
            })
            .unwrap();

        assert_eq!(state.stage(), PipelineStage::GapsIdentified);
        assert_eq!(state.concepts().len(), 1);
        assert_eq!(state.degradations(), ["doc p2 failed", "gaps failed"]);
    }

    #[test]
    fn test_validation_replaces_hypotheses() {
        let generated = Hypothesis::new("hyp_0", "First", HypothesisScores::default());
        let mut validated = generated.clone();
        validated.title = "First, validated".to_string();

        let state = SynthesisState::new()
            .apply(extracted())
            .and_then(|s| {
                s.apply(StageUpdate::GapsIdentified {
                    gaps: Vec::new(),
                    degradations: Vec::new(),
                })
            })
            .and_then(|s| {
                s.apply(StageUpdate::HypothesesGenerated {
                    hypotheses: vec![generated],
                    degradations: Vec::new(),
                })
            })
            .and_then(|s| {
                s.apply(StageUpdate::Validated {
                    hypotheses: vec![validated],
                    citations: Vec::new(),
                    degradations: Vec::new(),
                })
            })
            .unwrap();

        assert_eq!(state.stage(), PipelineStage::Done);
        assert_eq!(state.stage().progress(), 1.0);
        let output = state.into_output();
        assert_eq!(output.hypotheses.len(), 1);
        assert_eq!(output.hypotheses[0].title, "First, validated");
        assert_eq!(output.concepts.len(), 1);
    }

    #[test]
    fn test_out_of_order_update_rejected() {
        let err = SynthesisState::new()
            .apply(StageUpdate::Validated {
                hypotheses: Vec::new(),
                citations: Vec::new(),
                degradations: Vec::new(),
            })
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::OutOfOrder {
                current: "start",
                update: "validated"
            }
        );

        let state = SynthesisState::new().apply(extracted()).unwrap();
        assert!(state.apply(extracted()).is_err());
    }
}
