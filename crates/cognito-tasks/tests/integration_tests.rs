//! Integration tests for cognito-tasks
//!
//! These tests drive the tracker with scripted orchestrators and an
//! in-memory session store, covering the task lifecycle, recovery after
//! eviction or restart, and expiry.

use async_trait::async_trait;
use cognito_domain::traits::SessionStore;
use cognito_domain::{
    Document, Hypothesis, HypothesisScores, OrchestrationMode, SynthesisOutput, TaskId,
    TaskStatus,
};
use cognito_llm::MockProvider;
use cognito_pipeline::{
    DeterministicPipeline, Orchestrator, PipelineConfig, PipelineError, ProgressSink,
    SynthesisRequest,
};
use cognito_store::MemorySessionStore;
use cognito_tasks::{SubmitRequest, TaskOutcome, TaskPoll, TaskSnapshot, TaskTracker, TrackerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

/// Orchestrator with a fixed result, optionally held until released
struct ScriptedOrchestrator {
    result: Result<SynthesisOutput, PipelineError>,
    reports: Vec<(&'static str, f64)>,
    gate: Option<Arc<Notify>>,
    runs: AtomicUsize,
}

impl ScriptedOrchestrator {
    fn succeeding(output: SynthesisOutput) -> Self {
        Self {
            result: Ok(output),
            reports: Vec::new(),
            gate: None,
            runs: AtomicUsize::new(0),
        }
    }

    fn failing(error: PipelineError) -> Self {
        Self {
            result: Err(error),
            ..Self::succeeding(SynthesisOutput::default())
        }
    }
}

#[async_trait]
impl Orchestrator for ScriptedOrchestrator {
    fn mode(&self) -> OrchestrationMode {
        OrchestrationMode::Pipeline
    }

    async fn run(
        &self,
        _request: &SynthesisRequest,
        progress: &dyn ProgressSink,
    ) -> Result<SynthesisOutput, PipelineError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        for (step, value) in &self.reports {
            progress.report(step, *value, "working");
        }
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone()
    }
}

/// Orchestrator that panics partway through a run
struct PanickingOrchestrator;

#[async_trait]
impl Orchestrator for PanickingOrchestrator {
    fn mode(&self) -> OrchestrationMode {
        OrchestrationMode::Agentic
    }

    async fn run(
        &self,
        _request: &SynthesisRequest,
        progress: &dyn ProgressSink,
    ) -> Result<SynthesisOutput, PipelineError> {
        progress.report("research", 0.3, "searching");
        panic!("research role crashed");
    }
}

fn output_with_two_hypotheses() -> SynthesisOutput {
    SynthesisOutput {
        hypotheses: vec![
            Hypothesis::new("hyp_0", "Strong idea", HypothesisScores::new(0.9, 0.9, 0.9)),
            Hypothesis::new("hyp_1", "Weak idea", HypothesisScores::new(0.2, 0.2, 0.2)),
        ],
        degradations: vec!["validation of hyp_2 failed: timed out".to_string()],
        ..Default::default()
    }
}

fn request(documents: Vec<Document>) -> SubmitRequest {
    SubmitRequest {
        documents,
        focus_area: Some("sleep".to_string()),
        user_id: Some("ana".to_string()),
    }
}

fn one_document() -> Vec<Document> {
    vec![Document::new("p1", "Sleep Paper", "Sleep spindles support memory.")]
}

fn tracker(store: Arc<MemorySessionStore>) -> TaskTracker<MemorySessionStore> {
    TaskTracker::new(store, TrackerConfig::default()).unwrap()
}

async fn wait_until<F>(tracker: &TaskTracker<MemorySessionStore>, task_id: TaskId, done: F) -> TaskSnapshot
where
    F: Fn(&TaskSnapshot) -> bool,
{
    for _ in 0..500 {
        if let TaskPoll::Found(snapshot) = tracker.poll(task_id).await.unwrap() {
            if done(&snapshot) {
                return snapshot;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("task {} never reached the expected state", task_id);
}

async fn wait_for_terminal(tracker: &TaskTracker<MemorySessionStore>, task_id: TaskId) -> TaskSnapshot {
    wait_until(tracker, task_id, |s| s.status.is_terminal()).await
}

#[tokio::test]
async fn test_completed_task_is_persisted() {
    let store = Arc::new(MemorySessionStore::new());
    let tracker = tracker(Arc::clone(&store));
    let orchestrator = Arc::new(ScriptedOrchestrator::succeeding(output_with_two_hypotheses()));

    let task_id = tracker.submit(orchestrator, request(one_document()));
    let snapshot = wait_for_terminal(&tracker, task_id).await;

    assert_eq!(snapshot.status, TaskStatus::Completed);
    assert_eq!(snapshot.progress, 1.0);
    assert_eq!(snapshot.current_step, "done");
    assert!(snapshot.message.contains("2 hypotheses"));
    assert!(snapshot.message.contains("1 degraded steps"));
    assert!(!snapshot.recovered);

    match tracker.result(task_id).await.unwrap() {
        TaskOutcome::Completed(output) => assert_eq!(output.hypotheses.len(), 2),
        other => panic!("expected completed, got {:?}", other),
    }

    let session = store.find_by_task_id(task_id).unwrap().expect("session stored");
    assert_eq!(session.id, snapshot.session_id);
    assert_eq!(session.user_id, "ana");
    assert_eq!(session.paper_ids, vec!["p1"]);
    assert_eq!(session.focus_area.as_deref(), Some("sleep"));
    assert_eq!(session.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_no_usable_documents_fails_without_running() {
    let store = Arc::new(MemorySessionStore::new());
    let tracker = tracker(Arc::clone(&store));
    let orchestrator = Arc::new(ScriptedOrchestrator::succeeding(SynthesisOutput::default()));

    let blank = vec![Document::new("p1", "Blank", "   ")];
    let task_id = tracker.submit(orchestrator.clone(), request(blank));
    let snapshot = wait_for_terminal(&tracker, task_id).await;

    assert_eq!(snapshot.status, TaskStatus::Failed);
    assert!(snapshot.error.as_deref().unwrap().contains("Insufficient input"));
    assert_eq!(orchestrator.runs.load(Ordering::SeqCst), 0);
    assert_eq!(
        store.find_by_task_id(task_id).unwrap().unwrap().status,
        TaskStatus::Failed
    );
}

#[tokio::test]
async fn test_orchestration_error_is_reported() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let orchestrator = Arc::new(ScriptedOrchestrator::failing(PipelineError::Orchestration(
        "critic failed".to_string(),
    )));

    let task_id = tracker.submit(orchestrator, request(one_document()));
    let snapshot = wait_for_terminal(&tracker, task_id).await;

    assert_eq!(snapshot.status, TaskStatus::Failed);
    assert_eq!(snapshot.current_step, "failed");
    match tracker.result(task_id).await.unwrap() {
        TaskOutcome::Failed(message) => assert!(message.contains("critic failed")),
        other => panic!("expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_progress_is_monotonic_while_running() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let gate = Arc::new(Notify::new());
    let orchestrator = Arc::new(ScriptedOrchestrator {
        reports: vec![("extract", 0.5), ("late_report", 0.25)],
        gate: Some(Arc::clone(&gate)),
        ..ScriptedOrchestrator::succeeding(SynthesisOutput::default())
    });

    let task_id = tracker.submit(orchestrator, request(one_document()));
    let running = wait_until(&tracker, task_id, |s| s.current_step == "late_report").await;

    assert_eq!(running.status, TaskStatus::Processing);
    // 0.2 + 0.7 * 0.5; the later, lower report does not pull it back
    assert!((running.progress - 0.55).abs() < 1e-9);
    assert!(matches!(
        tracker.result(task_id).await.unwrap(),
        TaskOutcome::InProgress(_)
    ));
    assert_eq!(tracker.evict_finished(Duration::ZERO), 0);

    gate.notify_one();
    let finished = wait_for_terminal(&tracker, task_id).await;
    assert_eq!(finished.status, TaskStatus::Completed);
}

#[tokio::test]
async fn test_evicted_task_recovers_from_store() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let orchestrator = Arc::new(ScriptedOrchestrator::succeeding(output_with_two_hypotheses()));

    let task_id = tracker.submit(orchestrator, request(one_document()));
    wait_for_terminal(&tracker, task_id).await;

    assert_eq!(tracker.evict_finished(Duration::ZERO), 1);
    assert!(tracker.is_empty());

    match tracker.poll(task_id).await.unwrap() {
        TaskPoll::Found(snapshot) => {
            assert!(snapshot.recovered);
            assert_eq!(snapshot.status, TaskStatus::Completed);
            assert_eq!(snapshot.progress, 1.0);
        }
        TaskPoll::Expired => panic!("evicted task should be recovered"),
    }
    match tracker.result(task_id).await.unwrap() {
        TaskOutcome::Completed(output) => assert_eq!(output.hypotheses[0].id, "hyp_0"),
        other => panic!("expected completed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_new_tracker_recovers_earlier_tasks() {
    let store = Arc::new(MemorySessionStore::new());
    let first = tracker(Arc::clone(&store));
    let orchestrator = Arc::new(ScriptedOrchestrator::failing(PipelineError::Orchestration(
        "research failed".to_string(),
    )));
    let task_id = first.submit(orchestrator, request(one_document()));
    wait_for_terminal(&first, task_id).await;

    let restarted = tracker(store);
    match restarted.result(task_id).await.unwrap() {
        TaskOutcome::Failed(message) => assert!(message.contains("research failed")),
        other => panic!("expected recovered failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_user_scoped_lookup_hides_other_owners() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let orchestrator = Arc::new(ScriptedOrchestrator::succeeding(output_with_two_hypotheses()));

    let task_id = tracker.submit(orchestrator, request(one_document()));
    wait_for_terminal(&tracker, task_id).await;

    // Live registry entry
    assert!(matches!(
        tracker.poll_for_user(task_id, "ana").await.unwrap(),
        TaskPoll::Found(_)
    ));
    assert_eq!(
        tracker.poll_for_user(task_id, "bob").await.unwrap(),
        TaskPoll::Expired
    );
    assert_eq!(
        tracker.result_for_user(task_id, "bob").await.unwrap(),
        TaskOutcome::Expired
    );

    // Recovered from the store
    assert_eq!(tracker.evict_finished(Duration::ZERO), 1);
    assert_eq!(
        tracker.poll_for_user(task_id, "bob").await.unwrap(),
        TaskPoll::Expired
    );
    assert_eq!(
        tracker.result_for_user(task_id, "bob").await.unwrap(),
        TaskOutcome::Expired
    );
    match tracker.result_for_user(task_id, "ana").await.unwrap() {
        TaskOutcome::Completed(output) => assert_eq!(output.hypotheses.len(), 2),
        other => panic!("expected completed, got {:?}", other),
    }
    assert!(matches!(tracker.poll(task_id).await.unwrap(), TaskPoll::Found(_)));
}

#[tokio::test]
async fn test_unknown_task_expires() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let unknown = TaskId::new();

    assert_eq!(tracker.poll(unknown).await.unwrap(), TaskPoll::Expired);
    assert_eq!(tracker.result(unknown).await.unwrap(), TaskOutcome::Expired);
}

#[tokio::test]
async fn test_retention_keeps_recent_tasks() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let orchestrator = Arc::new(ScriptedOrchestrator::succeeding(SynthesisOutput::default()));
    let task_id = tracker.submit(orchestrator, request(one_document()));
    wait_for_terminal(&tracker, task_id).await;

    // default retention is an hour
    assert_eq!(tracker.evict_expired(), 0);
    assert_eq!(tracker.len(), 1);
}

#[tokio::test]
async fn test_deterministic_pipeline_end_to_end() {
    let store = Arc::new(MemorySessionStore::new());
    let tracker = tracker(Arc::clone(&store));
    let llm = MockProvider::new(r#"{"concepts": [], "claims": []}"#);
    let pipeline = DeterministicPipeline::new(Arc::new(llm), PipelineConfig::default()).unwrap();

    let task_id = tracker.submit(Arc::new(pipeline), request(one_document()));
    let snapshot = wait_for_terminal(&tracker, task_id).await;

    assert_eq!(snapshot.status, TaskStatus::Completed);
    let session = store.find_by_task_id(task_id).unwrap().unwrap();
    assert_eq!(session.mode, OrchestrationMode::Pipeline);
    assert!(session.output.unwrap().hypotheses.is_empty());
}

#[tokio::test]
async fn test_panicking_run_still_fails_and_persists() {
    let store = Arc::new(MemorySessionStore::new());
    let tracker = tracker(Arc::clone(&store));

    let task_id = tracker.submit(Arc::new(PanickingOrchestrator), request(one_document()));
    let snapshot = wait_for_terminal(&tracker, task_id).await;

    assert_eq!(snapshot.status, TaskStatus::Failed);
    assert_eq!(snapshot.progress, 1.0);
    assert!(snapshot
        .error
        .as_deref()
        .unwrap()
        .contains("task panicked: research role crashed"));

    let session = store.find_by_task_id(task_id).unwrap().unwrap();
    assert_eq!(session.status, TaskStatus::Failed);
    assert_eq!(session.mode, OrchestrationMode::Agentic);
}

#[tokio::test]
async fn test_multibyte_fenced_reply_completes_with_degradation() {
    let tracker = tracker(Arc::new(MemorySessionStore::new()));
    let llm = MockProvider::new("```日本{}```");
    let pipeline = DeterministicPipeline::new(Arc::new(llm), PipelineConfig::default()).unwrap();

    let task_id = tracker.submit(Arc::new(pipeline), request(one_document()));
    let snapshot = wait_for_terminal(&tracker, task_id).await;

    assert_eq!(snapshot.status, TaskStatus::Completed);
    match tracker.result(task_id).await.unwrap() {
        TaskOutcome::Completed(output) => {
            assert!(output.hypotheses.is_empty());
            assert!(output.degradations.iter().any(|d| d.contains("p1")));
        }
        other => panic!("expected completed, got {:?}", other),
    }
}
