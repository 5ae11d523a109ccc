//! Process-wide task registry with session-store recovery

use crate::config::TrackerConfig;
use crate::error::TaskError;
use crate::snapshot::{TaskOutcome, TaskPoll, TaskSnapshot};
use cognito_domain::session::unix_now;
use cognito_domain::{
    Document, OrchestrationMode, SessionStore, SynthesisOutput, SynthesisSession, TaskId,
    TaskStatus,
};
use cognito_pipeline::{Orchestrator, ProgressSink, SynthesisRequest};
use dashmap::DashMap;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Progress reserved before the orchestrator starts reporting
const START_PROGRESS: f64 = 0.2;

/// Share of the progress range given to the orchestrator
const RUN_PROGRESS_SPAN: f64 = 0.7;

/// A synthesis job to run in the background
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Documents with extracted text
    pub documents: Vec<Document>,
    /// Optional focus area
    pub focus_area: Option<String>,
    /// Owning user; the configured default when absent
    pub user_id: Option<String>,
}

#[derive(Debug, Clone)]
struct TaskEntry {
    status: TaskStatus,
    progress: f64,
    current_step: String,
    message: String,
    session_id: String,
    user_id: String,
    error: Option<String>,
    result: Option<SynthesisOutput>,
    finished_at: Option<Instant>,
}

impl TaskEntry {
    fn pending(session_id: String, user_id: String) -> Self {
        Self {
            status: TaskStatus::Pending,
            progress: 0.0,
            current_step: "queued".to_string(),
            message: "Task accepted".to_string(),
            session_id,
            user_id,
            error: None,
            result: None,
            finished_at: None,
        }
    }

    fn snapshot(&self, task_id: TaskId) -> TaskSnapshot {
        TaskSnapshot {
            task_id,
            status: self.status,
            progress: self.progress,
            current_step: self.current_step.clone(),
            message: self.message.clone(),
            session_id: self.session_id.clone(),
            error: self.error.clone(),
            recovered: false,
        }
    }

    fn outcome(&self, task_id: TaskId) -> TaskOutcome {
        match self.status {
            TaskStatus::Completed => match &self.result {
                Some(output) => TaskOutcome::Completed(Box::new(output.clone())),
                None => TaskOutcome::Failed("completed without a result".to_string()),
            },
            TaskStatus::Failed => TaskOutcome::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
            TaskStatus::Pending | TaskStatus::Processing => {
                TaskOutcome::InProgress(self.snapshot(task_id))
            }
        }
    }
}

/// Whether `owner`'s task is visible to a lookup scoped to `user`
fn visible_to(owner: &str, user: Option<&str>) -> bool {
    user.map_or(true, |user| user == owner)
}

/// Tracks background synthesis tasks by id
///
/// Status only moves forward (`pending → processing → completed | failed`)
/// and progress never decreases. Terminal outcomes are written to the
/// session store, so a task evicted from memory, or started by an earlier
/// process, is still answered from there.
pub struct TaskTracker<S: SessionStore + 'static> {
    tasks: Arc<DashMap<TaskId, TaskEntry>>,
    store: Arc<S>,
    config: TrackerConfig,
}

impl<S: SessionStore + 'static> Clone for TaskTracker<S> {
    fn clone(&self) -> Self {
        Self {
            tasks: Arc::clone(&self.tasks),
            store: Arc::clone(&self.store),
            config: self.config.clone(),
        }
    }
}

impl<S: SessionStore + 'static> TaskTracker<S> {
    /// Create a tracker persisting to `store`
    pub fn new(store: Arc<S>, config: TrackerConfig) -> Result<Self, TaskError> {
        config.validate().map_err(TaskError::Config)?;
        Ok(Self {
            tasks: Arc::new(DashMap::new()),
            store,
            config,
        })
    }

    /// Number of tasks held in memory
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task is held in memory
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Accept a task and start it in the background
    ///
    /// Returns immediately. Must be called inside a Tokio runtime.
    pub fn submit(&self, orchestrator: Arc<dyn Orchestrator>, request: SubmitRequest) -> TaskId {
        let task_id = TaskId::new();
        let session_id = format!("session_{}", task_id);
        let user_id = request
            .user_id
            .clone()
            .unwrap_or_else(|| self.config.default_user.clone());
        self.tasks
            .insert(task_id, TaskEntry::pending(session_id, user_id.clone()));
        info!(
            "Task {} accepted for {} ({} documents, {} mode)",
            task_id,
            user_id,
            request.documents.len(),
            orchestrator.mode()
        );

        let tracker = self.clone();
        tokio::spawn(async move {
            tracker.execute(task_id, user_id, orchestrator, request).await;
        });
        task_id
    }

    async fn execute(
        &self,
        task_id: TaskId,
        user_id: String,
        orchestrator: Arc<dyn Orchestrator>,
        request: SubmitRequest,
    ) {
        let synthesis = SynthesisRequest::new(request.documents, request.focus_area);
        let mode = orchestrator.mode();

        if let Err(e) = synthesis.validate() {
            warn!("Task {} rejected: {}", task_id, e);
            self.finish(task_id, &user_id, &synthesis, mode, Err(e.to_string()))
                .await;
            return;
        }

        self.transition(
            task_id,
            TaskStatus::Processing,
            START_PROGRESS / 2.0,
            "starting",
            format!("Starting {} synthesis", mode),
        );

        let sink = TaskProgress {
            tracker: self,
            task_id,
        };
        let result = match AssertUnwindSafe(orchestrator.run(&synthesis, &sink))
            .catch_unwind()
            .await
        {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(panic) => {
                let reason = panic_reason(panic.as_ref());
                error!("Task {} panicked: {}", task_id, reason);
                Err(format!("task panicked: {}", reason))
            }
        };
        self.finish(task_id, &user_id, &synthesis, mode, result).await;
    }

    /// Persist the outcome, then publish it in the registry
    async fn finish(
        &self,
        task_id: TaskId,
        user_id: &str,
        request: &SynthesisRequest,
        mode: OrchestrationMode,
        result: Result<SynthesisOutput, String>,
    ) {
        let Some(session_id) = self.tasks.get(&task_id).map(|e| e.session_id.clone()) else {
            warn!("Task {} vanished before finishing", task_id);
            return;
        };

        let (status, output, error) = match result {
            Ok(output) => (TaskStatus::Completed, Some(output), None),
            Err(e) => (TaskStatus::Failed, None, Some(e)),
        };
        let session = SynthesisSession {
            id: session_id,
            task_id: Some(task_id),
            user_id: user_id.to_string(),
            paper_ids: request.documents.iter().map(|d| d.id.clone()).collect(),
            focus_area: request.focus().map(str::to_string),
            mode,
            status,
            output,
            error,
            created_at: unix_now(),
        };

        let persist_note = match self.persist(session.clone()).await {
            Ok(()) => String::new(),
            Err(e) => {
                error!("Task {} result could not be persisted: {}", task_id, e);
                format!("; not persisted: {}", e)
            }
        };

        let (step, message) = match (&session.output, &session.error) {
            (Some(output), _) => {
                info!(
                    "Task {} completed with {} hypotheses",
                    task_id,
                    output.hypotheses.len()
                );
                (
                    "done",
                    format!(
                        "Completed with {} hypotheses ({} degraded steps){}",
                        output.hypotheses.len(),
                        output.degradations.len(),
                        persist_note
                    ),
                )
            }
            (None, error) => (
                "failed",
                format!(
                    "Failed: {}{}",
                    error.as_deref().unwrap_or("unknown error"),
                    persist_note
                ),
            ),
        };

        if let Some(mut entry) = self.tasks.get_mut(&task_id) {
            if !entry.status.can_transition_to(status) {
                warn!(
                    "Task {} cannot move from {} to {}",
                    task_id, entry.status, status
                );
                return;
            }
            entry.status = status;
            entry.progress = 1.0;
            entry.current_step = step.to_string();
            entry.message = message;
            entry.error = session.error;
            entry.result = session.output;
            entry.finished_at = Some(Instant::now());
        }
    }

    async fn persist(&self, session: SynthesisSession) -> Result<(), TaskError> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            store
                .insert_session(&session)
                .map_err(|e| TaskError::Store(e.to_string()))
        })
        .await
        .map_err(|e| TaskError::Store(e.to_string()))?
    }

    fn transition(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        progress: f64,
        step: &str,
        message: String,
    ) {
        let Some(mut entry) = self.tasks.get_mut(&task_id) else {
            return;
        };
        if !entry.status.can_transition_to(status) {
            debug!(
                "Ignoring {} update for task {} in {}",
                status, task_id, entry.status
            );
            return;
        }
        entry.status = status;
        entry.progress = entry.progress.max(progress.clamp(0.0, 1.0));
        entry.current_step = step.to_string();
        entry.message = message;
    }

    /// Current status of a task
    ///
    /// Falls back to the session store when the registry has no entry;
    /// [`TaskPoll::Expired`] only when neither knows the id.
    pub async fn poll(&self, task_id: TaskId) -> Result<TaskPoll, TaskError> {
        self.poll_scoped(task_id, None).await
    }

    /// [`poll`](Self::poll) restricted to tasks owned by `user_id`
    ///
    /// Another user's task reads as [`TaskPoll::Expired`].
    pub async fn poll_for_user(&self, task_id: TaskId, user_id: &str) -> Result<TaskPoll, TaskError> {
        self.poll_scoped(task_id, Some(user_id)).await
    }

    async fn poll_scoped(&self, task_id: TaskId, user: Option<&str>) -> Result<TaskPoll, TaskError> {
        let live = self
            .tasks
            .get(&task_id)
            .map(|e| visible_to(&e.user_id, user).then(|| e.snapshot(task_id)));
        if let Some(snapshot) = live {
            return Ok(snapshot.map_or(TaskPoll::Expired, TaskPoll::Found));
        }

        match self.recover(task_id, user).await? {
            Some(session) => Ok(TaskPoll::Found(TaskSnapshot::from_session(task_id, &session))),
            None => Ok(TaskPoll::Expired),
        }
    }

    /// Final payload of a task, or its error, or its progress so far
    pub async fn result(&self, task_id: TaskId) -> Result<TaskOutcome, TaskError> {
        self.result_scoped(task_id, None).await
    }

    /// [`result`](Self::result) restricted to tasks owned by `user_id`
    pub async fn result_for_user(
        &self,
        task_id: TaskId,
        user_id: &str,
    ) -> Result<TaskOutcome, TaskError> {
        self.result_scoped(task_id, Some(user_id)).await
    }

    async fn result_scoped(
        &self,
        task_id: TaskId,
        user: Option<&str>,
    ) -> Result<TaskOutcome, TaskError> {
        let live = self
            .tasks
            .get(&task_id)
            .map(|e| visible_to(&e.user_id, user).then(|| e.outcome(task_id)));
        if let Some(outcome) = live {
            return Ok(outcome.unwrap_or(TaskOutcome::Expired));
        }

        let Some(session) = self.recover(task_id, user).await? else {
            return Ok(TaskOutcome::Expired);
        };
        Ok(match (session.status, session.output) {
            (TaskStatus::Completed, Some(output)) => TaskOutcome::Completed(Box::new(output)),
            (TaskStatus::Failed, _) | (TaskStatus::Completed, None) => TaskOutcome::Failed(
                session
                    .error
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
            (status, output) => {
                let session = SynthesisSession {
                    status,
                    output,
                    ..session
                };
                TaskOutcome::InProgress(TaskSnapshot::from_session(task_id, &session))
            }
        })
    }

    async fn recover(
        &self,
        task_id: TaskId,
        user: Option<&str>,
    ) -> Result<Option<SynthesisSession>, TaskError> {
        debug!("Task {} not in registry, checking session store", task_id);
        let store = Arc::clone(&self.store);
        let session = tokio::task::spawn_blocking(move || {
            store
                .find_by_task_id(task_id)
                .map_err(|e| TaskError::Store(e.to_string()))
        })
        .await
        .map_err(|e| TaskError::Store(e.to_string()))??;
        Ok(session.filter(|s| visible_to(&s.user_id, user)))
    }

    /// Drop finished tasks older than `max_age` from memory
    ///
    /// Returns how many were removed. Running tasks are never evicted.
    pub fn evict_finished(&self, max_age: Duration) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, entry| match entry.finished_at {
            Some(finished) => finished.elapsed() < max_age,
            None => true,
        });
        let evicted = before.saturating_sub(self.tasks.len());
        if evicted > 0 {
            info!("Evicted {} finished tasks from the registry", evicted);
        }
        evicted
    }

    /// [`evict_finished`](Self::evict_finished) with the configured retention
    pub fn evict_expired(&self) -> usize {
        self.evict_finished(self.config.retention())
    }
}

fn panic_reason(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Maps orchestrator progress into the tracker's range
struct TaskProgress<'a, S: SessionStore + 'static> {
    tracker: &'a TaskTracker<S>,
    task_id: TaskId,
}

impl<S: SessionStore + 'static> ProgressSink for TaskProgress<'_, S> {
    fn report(&self, step: &str, progress: f64, message: &str) {
        debug!("Task {} at {} ({:.2})", self.task_id, step, progress);
        self.tracker.transition(
            self.task_id,
            TaskStatus::Processing,
            START_PROGRESS + RUN_PROGRESS_SPAN * progress.clamp(0.0, 1.0),
            step,
            message.to_string(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_entry_snapshot() {
        let task_id = TaskId::new();
        let snapshot = TaskEntry::pending("session_x".to_string(), "ana".to_string())
            .snapshot(task_id);
        assert_eq!(snapshot.status, TaskStatus::Pending);
        assert_eq!(snapshot.progress, 0.0);
        assert_eq!(snapshot.current_step, "queued");
        assert!(!snapshot.recovered);
    }

    #[test]
    fn test_unscoped_lookup_sees_every_owner() {
        assert!(visible_to("ana", None));
        assert!(visible_to("ana", Some("ana")));
        assert!(!visible_to("ana", Some("bob")));
    }

    #[test]
    fn test_panic_reason_reads_payloads() {
        let literal: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(format!("index {} out of range", 4));
        let other: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_reason(literal.as_ref()), "boom");
        assert_eq!(panic_reason(owned.as_ref()), "index 4 out of range");
        assert_eq!(panic_reason(other.as_ref()), "unknown panic");
    }
}
