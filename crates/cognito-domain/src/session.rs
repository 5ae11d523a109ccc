//! Synthesis sessions and their output payload

use crate::agent::{AgentMessage, ToolInvocation};
use crate::citation::Citation;
use crate::claim::Claim;
use crate::concept::Concept;
use crate::gap::ResearchGap;
use crate::hypothesis::Hypothesis;
use crate::task::{TaskId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Current time as unix seconds
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// How a synthesis task sequences its stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrchestrationMode {
    /// Fixed four-stage pipeline
    #[default]
    Pipeline,
    /// Supervisor-routed agent roles with tools
    Agentic,
}

impl OrchestrationMode {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            OrchestrationMode::Pipeline => "pipeline",
            OrchestrationMode::Agentic => "agentic",
        }
    }
}

impl fmt::Display for OrchestrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrchestrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pipeline" => Ok(OrchestrationMode::Pipeline),
            "agentic" => Ok(OrchestrationMode::Agentic),
            other => Err(format!("unknown orchestration mode: {}", other)),
        }
    }
}

/// Final payload of a synthesis run
///
/// The agentic fields stay empty for pipeline runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOutput {
    /// Hypotheses sorted by confidence, highest first
    pub hypotheses: Vec<Hypothesis>,
    /// Identified research gaps
    #[serde(default)]
    pub research_gaps: Vec<ResearchGap>,
    /// Extracted concepts
    #[serde(default)]
    pub concepts: Vec<Concept>,
    /// Extracted claims
    #[serde(default)]
    pub claims: Vec<Claim>,
    /// Citations created by validation
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Role-tagged transcript, in invocation order
    #[serde(default)]
    pub agent_messages: Vec<AgentMessage>,
    /// Tool calls made by agent roles
    #[serde(default)]
    pub tool_calls: Vec<ToolInvocation>,
    /// Per-role tool results
    #[serde(default)]
    pub tool_results: BTreeMap<String, serde_json::Value>,
    /// Human-readable notes for every degraded item
    #[serde(default)]
    pub degradations: Vec<String>,
}

impl SynthesisOutput {
    /// Title of the highest-confidence hypothesis
    pub fn top_hypothesis(&self) -> Option<&str> {
        self.hypotheses.first().map(|h| h.title.as_str())
    }
}

/// A persisted synthesis session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesisSession {
    /// Session identifier
    pub id: String,
    /// Task that produced the session, when the store keeps it
    pub task_id: Option<TaskId>,
    /// Owning user
    pub user_id: String,
    /// Documents synthesized
    pub paper_ids: Vec<String>,
    /// Optional focus area
    pub focus_area: Option<String>,
    /// How the task was orchestrated
    pub mode: OrchestrationMode,
    /// Terminal status of the task
    pub status: TaskStatus,
    /// Result payload, absent for failed tasks
    pub output: Option<SynthesisOutput>,
    /// Error message, present for failed tasks
    pub error: Option<String>,
    /// Creation time (unix seconds)
    pub created_at: u64,
}

impl SynthesisSession {
    /// Compact listing view
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            task_id: self.task_id,
            paper_ids: self.paper_ids.clone(),
            focus_area: self.focus_area.clone(),
            mode: self.mode,
            status: self.status,
            hypothesis_count: self.output.as_ref().map_or(0, |o| o.hypotheses.len()),
            top_hypothesis: self
                .output
                .as_ref()
                .and_then(|o| o.top_hypothesis())
                .map(str::to_string),
            created_at: self.created_at,
        }
    }

    /// Hypothesis with `id` in this session's output
    pub fn hypothesis(&self, id: &str) -> Option<&Hypothesis> {
        self.output
            .as_ref()
            .and_then(|o| o.hypotheses.iter().find(|h| h.id == id))
    }
}

/// A hypothesis a user bookmarked from one of their sessions
///
/// Holds a copy of the hypothesis, so it outlives the session it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedHypothesis {
    /// Bookmark identifier
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Session the hypothesis was taken from
    pub session_id: String,
    /// The hypothesis as it was when saved
    pub hypothesis: Hypothesis,
    /// Free-form notes
    #[serde(default)]
    pub notes: String,
    /// Save time (unix seconds)
    pub saved_at: u64,
}

impl SavedHypothesis {
    /// Bookmark `hypothesis` from `session_id` for `user_id`, now
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        hypothesis: Hypothesis,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            hypothesis,
            notes: notes.into(),
            saved_at: unix_now(),
        }
    }

    /// Copy `hypothesis_id` out of `session` if `user_id` owns the session
    pub fn from_session(
        session: &SynthesisSession,
        hypothesis_id: &str,
        user_id: &str,
        notes: &str,
    ) -> Option<Self> {
        if session.user_id != user_id {
            return None;
        }
        let hypothesis = session.hypothesis(hypothesis_id)?.clone();
        Some(Self::new(user_id, session.id.clone(), hypothesis, notes))
    }
}

/// Row of a session listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session identifier
    pub id: String,
    /// Producing task
    pub task_id: Option<TaskId>,
    /// Documents synthesized
    pub paper_ids: Vec<String>,
    /// Optional focus area
    pub focus_area: Option<String>,
    /// Orchestration mode
    pub mode: OrchestrationMode,
    /// Terminal status
    pub status: TaskStatus,
    /// Number of hypotheses in the output
    pub hypothesis_count: usize,
    /// Title of the best hypothesis
    pub top_hypothesis: Option<String>,
    /// Creation time (unix seconds)
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HypothesisScores, Hypothesis};

    #[test]
    fn test_summary_counts_hypotheses() {
        let output = SynthesisOutput {
            hypotheses: vec![
                Hypothesis::new("hyp_0", "Best", HypothesisScores::new(0.9, 0.9, 0.9)),
                Hypothesis::new("hyp_1", "Other", HypothesisScores::default()),
            ],
            ..Default::default()
        };
        let session = SynthesisSession {
            id: "s1".to_string(),
            task_id: None,
            user_id: "u1".to_string(),
            paper_ids: vec!["p1".to_string()],
            focus_area: None,
            mode: OrchestrationMode::Pipeline,
            status: TaskStatus::Completed,
            output: Some(output),
            error: None,
            created_at: 1,
        };
        let summary = session.summary();
        assert_eq!(summary.hypothesis_count, 2);
        assert_eq!(summary.top_hypothesis.as_deref(), Some("Best"));
    }

    #[test]
    fn test_saved_hypothesis_requires_owner_and_id() {
        let session = SynthesisSession {
            id: "s1".to_string(),
            task_id: None,
            user_id: "u1".to_string(),
            paper_ids: vec![],
            focus_area: None,
            mode: OrchestrationMode::Agentic,
            status: TaskStatus::Completed,
            output: Some(SynthesisOutput {
                hypotheses: vec![Hypothesis::new("hyp_1", "Kept", HypothesisScores::default())],
                ..Default::default()
            }),
            error: None,
            created_at: 1,
        };

        let saved = SavedHypothesis::from_session(&session, "hyp_1", "u1", "follow up").unwrap();
        assert_eq!(saved.session_id, "s1");
        assert_eq!(saved.hypothesis.title, "Kept");
        assert_eq!(saved.notes, "follow up");
        assert!(SavedHypothesis::from_session(&session, "hyp_1", "u2", "").is_none());
        assert!(SavedHypothesis::from_session(&session, "hyp_9", "u1", "").is_none());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("agentic".parse::<OrchestrationMode>(), Ok(OrchestrationMode::Agentic));
        assert!("other".parse::<OrchestrationMode>().is_err());
    }
}
