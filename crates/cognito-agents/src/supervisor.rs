//! Supervisor routing
//!
//! A fixed table from the last completed step to the next role:
//!
//! | step                  | next     |
//! |-----------------------|----------|
//! | start                 | research |
//! | research_complete     | analyze  |
//! | analysis_complete     | generate |
//! | hypotheses_generated  | critique |
//! | validation_complete   | END      |
//!
//! Any recorded error routes to END.

use std::fmt;

/// Marker of the last completed role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AgentStep {
    /// Nothing ran yet
    #[default]
    Start,
    /// Research role finished
    ResearchComplete,
    /// Analyzer role finished
    AnalysisComplete,
    /// Generator role finished
    HypothesesGenerated,
    /// Critic role finished
    ValidationComplete,
}

impl AgentStep {
    /// Stable label used in progress reports
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStep::Start => "start",
            AgentStep::ResearchComplete => "research_complete",
            AgentStep::AnalysisComplete => "analysis_complete",
            AgentStep::HypothesesGenerated => "hypotheses_generated",
            AgentStep::ValidationComplete => "validation_complete",
        }
    }
}

impl fmt::Display for AgentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the supervisor sends control next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Research role
    Research,
    /// Analyzer role
    Analyze,
    /// Generator role
    Generate,
    /// Critic role
    Critique,
    /// Stop
    End,
}

/// Pick the next role
pub fn route(step: AgentStep, has_error: bool) -> Route {
    if has_error {
        return Route::End;
    }
    match step {
        AgentStep::Start => Route::Research,
        AgentStep::ResearchComplete => Route::Analyze,
        AgentStep::AnalysisComplete => Route::Generate,
        AgentStep::HypothesesGenerated => Route::Critique,
        AgentStep::ValidationComplete => Route::End,
    }
}
