//! Mutable state of one agentic run

use crate::supervisor::AgentStep;
use crate::transcript::Transcript;
use cognito_domain::{
    AgentRole, Claim, Concept, Hypothesis, SynthesisOutput, ToolInvocation,
};
use serde_json::Value;
use std::collections::BTreeMap;

/// Everything the roles share during a run
#[derive(Debug, Clone, Default)]
pub struct AgenticState {
    current_step: AgentStep,
    progress: f64,
    error: Option<String>,
    transcript: Transcript,
    pub(crate) concepts: Vec<Concept>,
    pub(crate) claims: Vec<Claim>,
    pub(crate) hypotheses: Vec<Hypothesis>,
    pub(crate) tool_results: BTreeMap<String, Value>,
    pub(crate) degradations: Vec<String>,
    /// Novelty of the research direction as found by the research role
    pub(crate) novelty_hint: Option<f64>,
}

impl AgenticState {
    /// Fresh state at [`AgentStep::Start`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last completed step
    pub fn current_step(&self) -> AgentStep {
        self.current_step
    }

    /// Fraction complete; never decreases
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Error that ended the run, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Role messages so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Record a successful role: one message, then the step and progress
    pub(crate) fn complete(
        &mut self,
        role: AgentRole,
        message: String,
        step: AgentStep,
        progress: f64,
    ) {
        self.transcript.push(role, message);
        self.current_step = step;
        self.advance(progress);
    }

    /// Record a failed role: one message and the error
    pub(crate) fn fail(&mut self, role: AgentRole, error: String) {
        self.transcript.push(role, format!("{} failed: {}", role, error));
        self.error = Some(error);
    }

    pub(crate) fn advance(&mut self, progress: f64) {
        self.progress = self.progress.max(progress);
    }

    /// Convert into the run's output
    pub fn into_output(self, tool_calls: Vec<ToolInvocation>) -> SynthesisOutput {
        SynthesisOutput {
            hypotheses: self.hypotheses,
            concepts: self.concepts,
            claims: self.claims,
            agent_messages: self.transcript.into_messages(),
            tool_calls,
            tool_results: self.tool_results,
            degradations: self.degradations,
            ..SynthesisOutput::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_never_decreases() {
        let mut state = AgenticState::new();
        state.complete(
            AgentRole::Research,
            "done".to_string(),
            AgentStep::ResearchComplete,
            0.3,
        );
        state.advance(0.1);
        assert_eq!(state.progress(), 0.3);
        assert_eq!(state.current_step(), AgentStep::ResearchComplete);
    }

    #[test]
    fn test_failure_appends_one_message() {
        let mut state = AgenticState::new();
        state.fail(AgentRole::Analyzer, "no papers".to_string());
        assert_eq!(state.transcript().len(), 1);
        assert_eq!(
            state.transcript().last().unwrap().content,
            "analyzer_agent failed: no papers"
        );
        assert_eq!(state.error(), Some("no papers"));
        assert_eq!(state.current_step(), AgentStep::Start);
    }
}
