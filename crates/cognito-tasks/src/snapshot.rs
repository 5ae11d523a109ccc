//! What callers see when they poll a task

use cognito_domain::{SynthesisOutput, SynthesisSession, TaskId, TaskStatus};

/// Point-in-time view of a task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSnapshot {
    /// Task identifier
    pub task_id: TaskId,
    /// Lifecycle status
    pub status: TaskStatus,
    /// Fraction complete in [0, 1]; never decreases
    pub progress: f64,
    /// Label of the last reported step
    pub current_step: String,
    /// Human-readable status line
    pub message: String,
    /// Session the result is stored under
    pub session_id: String,
    /// Error text for failed tasks
    pub error: Option<String>,
    /// True when the answer came from the session store rather than memory
    pub recovered: bool,
}

impl TaskSnapshot {
    /// Rebuild a snapshot from a persisted session
    pub fn from_session(task_id: TaskId, session: &SynthesisSession) -> Self {
        let (current_step, message) = match (&session.output, &session.error) {
            (Some(output), _) => (
                "done",
                format!(
                    "Completed with {} hypotheses (recovered from session store)",
                    output.hypotheses.len()
                ),
            ),
            (None, Some(error)) => ("failed", format!("Failed: {}", error)),
            (None, None) => ("unknown", "Recovered from session store".to_string()),
        };

        Self {
            task_id,
            status: session.status,
            progress: if session.status.is_terminal() { 1.0 } else { 0.0 },
            current_step: current_step.to_string(),
            message,
            session_id: session.id.clone(),
            error: session.error.clone(),
            recovered: true,
        }
    }
}

/// Answer to a status poll
#[derive(Debug, Clone, PartialEq)]
pub enum TaskPoll {
    /// Known to the registry or the session store
    Found(TaskSnapshot),
    /// Known to neither
    Expired,
}

/// Answer to a result fetch
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Finished with a result
    Completed(Box<SynthesisOutput>),
    /// Finished with an error
    Failed(String),
    /// Not finished yet
    InProgress(TaskSnapshot),
    /// Known to neither the registry nor the session store
    Expired,
}
