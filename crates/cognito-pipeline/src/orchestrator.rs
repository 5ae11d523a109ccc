//! The orchestration seam shared by the pipeline and agentic variants

use crate::error::PipelineError;
use async_trait::async_trait;
use cognito_domain::{Document, OrchestrationMode, SynthesisOutput};

/// Input to one synthesis run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisRequest {
    /// Documents with already-extracted text
    pub documents: Vec<Document>,
    /// Optional steering topic
    pub focus_area: Option<String>,
}

impl SynthesisRequest {
    /// Create a request
    pub fn new(documents: Vec<Document>, focus_area: Option<String>) -> Self {
        Self {
            documents,
            focus_area,
        }
    }

    /// Focus area with surrounding whitespace removed, if non-empty
    pub fn focus(&self) -> Option<&str> {
        self.focus_area
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
    }

    /// Fail fast when there is nothing to synthesize from
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.documents.is_empty() {
            return Err(PipelineError::InsufficientInput(
                "no documents provided".to_string(),
            ));
        }
        if !self.documents.iter().any(Document::is_usable) {
            return Err(PipelineError::InsufficientInput(format!(
                "none of the {} documents contain text",
                self.documents.len()
            )));
        }
        Ok(())
    }
}

/// Receives progress as a run advances
///
/// `progress` is a fraction in [0, 1] that never decreases within a run.
pub trait ProgressSink: Send + Sync {
    /// Record that `step` reached `progress`
    fn report(&self, step: &str, progress: f64, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str, f64, &str) + Send + Sync,
{
    fn report(&self, step: &str, progress: f64, message: &str) {
        self(step, progress, message)
    }
}

/// Discards progress reports
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _step: &str, _progress: f64, _message: &str) {}
}

/// A strategy that turns documents into validated hypotheses
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Which variant this is
    fn mode(&self) -> OrchestrationMode;

    /// Run synthesis to completion
    async fn run(
        &self,
        request: &SynthesisRequest,
        progress: &dyn ProgressSink,
    ) -> Result<SynthesisOutput, PipelineError>;
}
