//! Integration tests for cognito-store
//!
//! These tests exercise the SQLite store on disk, including databases
//! created before the task_id column existed.

use cognito_domain::traits::SessionStore;
use cognito_domain::{
    Hypothesis, HypothesisScores, OrchestrationMode, SynthesisOutput, SynthesisSession, TaskId,
    TaskStatus,
};
use cognito_store::SqliteSessionStore;
use rusqlite::Connection;

fn completed_session(id: &str, user: &str, created_at: u64) -> SynthesisSession {
    let mut best = Hypothesis::new("hyp_0", "Sleep consolidates motor skills", HypothesisScores::new(0.9, 0.8, 0.7));
    best.source_concepts = vec!["Sleep".to_string(), "Motor learning".to_string()];
    let other = Hypothesis::new("hyp_1", "Weaker idea", HypothesisScores::new(0.2, 0.2, 0.2));

    SynthesisSession {
        id: id.to_string(),
        task_id: Some(TaskId::new()),
        user_id: user.to_string(),
        paper_ids: vec!["p1".to_string(), "p2".to_string()],
        focus_area: Some("learning".to_string()),
        mode: OrchestrationMode::Pipeline,
        status: TaskStatus::Completed,
        output: Some(SynthesisOutput {
            hypotheses: vec![best, other],
            degradations: vec!["document p3: extraction timed out".to_string()],
            ..Default::default()
        }),
        error: None,
        created_at,
    }
}

#[test]
fn test_session_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.db");
    let session = completed_session("s1", "u1", 100);

    {
        let store = SqliteSessionStore::open(&path).unwrap();
        store.insert_session(&session).unwrap();
    }

    let store = SqliteSessionStore::open(&path).unwrap();
    let loaded = store.get_session("s1").unwrap().expect("session persisted");
    assert_eq!(loaded, session);

    let by_task = store
        .find_by_task_id(session.task_id.unwrap())
        .unwrap()
        .expect("found by task id");
    assert_eq!(by_task.id, "s1");
}

#[test]
fn test_confidence_recomputed_on_load() {
    let store = SqliteSessionStore::open(":memory:").unwrap();
    let session = completed_session("s1", "u1", 1);
    store.insert_session(&session).unwrap();

    let loaded = store.get_session("s1").unwrap().unwrap();
    for h in &loaded.output.unwrap().hypotheses {
        let s = h.scores();
        let expected = 0.35 * s.testability() + 0.35 * s.novelty() + 0.30 * s.significance();
        assert!((h.confidence() - expected).abs() < 1e-9);
    }
}

#[test]
fn test_legacy_database_without_task_id() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE synthesis_sessions (
                id TEXT PRIMARY KEY, user_id TEXT NOT NULL, paper_ids TEXT NOT NULL,
                focus_area TEXT, mode TEXT NOT NULL DEFAULT 'pipeline', status TEXT NOT NULL,
                output TEXT, error TEXT, created_at INTEGER NOT NULL
            );",
        )
        .unwrap();
    }

    let store = SqliteSessionStore::open(&path).unwrap();
    assert!(!store.supports_task_ids());

    let session = completed_session("s1", "u1", 5);
    store.insert_session(&session).unwrap();

    let loaded = store.get_session("s1").unwrap().unwrap();
    assert_eq!(loaded.task_id, None);
    assert_eq!(loaded.output, session.output);
    assert!(store
        .find_by_task_id(session.task_id.unwrap())
        .unwrap()
        .is_none());

    store.migrate_task_id_column().unwrap();
    store.insert_session(&session).unwrap();
    assert!(store
        .find_by_task_id(session.task_id.unwrap())
        .unwrap()
        .is_some());
}

#[test]
fn test_list_and_delete_scoped_to_user() {
    let store = SqliteSessionStore::open(":memory:").unwrap();
    store.insert_session(&completed_session("old", "u1", 1)).unwrap();
    store.insert_session(&completed_session("new", "u1", 2)).unwrap();
    store.insert_session(&completed_session("theirs", "u2", 3)).unwrap();

    let listed = store.list_sessions("u1", 10, 0).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id, "new");
    assert_eq!(listed[0].hypothesis_count, 2);
    assert_eq!(
        listed[0].top_hypothesis.as_deref(),
        Some("Sleep consolidates motor skills")
    );

    assert_eq!(store.list_sessions("u1", 1, 1).unwrap()[0].id, "old");

    assert!(!store.delete_session("theirs", "u1").unwrap());
    assert!(store.delete_session("old", "u1").unwrap());
    assert!(store.get_session("old").unwrap().is_none());
    assert!(store.get_session("theirs").unwrap().is_some());
}

#[test]
fn test_failed_session_without_output() {
    let store = SqliteSessionStore::open(":memory:").unwrap();
    let mut session = completed_session("f1", "u1", 1);
    session.status = TaskStatus::Failed;
    session.output = None;
    session.error = Some("no usable documents".to_string());
    store.insert_session(&session).unwrap();

    let loaded = store.get_session("f1").unwrap().unwrap();
    assert_eq!(loaded.status, TaskStatus::Failed);
    assert_eq!(loaded.error.as_deref(), Some("no usable documents"));
    assert_eq!(loaded.summary().hypothesis_count, 0);
}

#[test]
fn test_saved_hypotheses_survive_reopen_and_session_delete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessions.db");

    {
        let store = SqliteSessionStore::open(&path).unwrap();
        store.insert_session(&completed_session("s1", "u1", 1)).unwrap();

        let first = store
            .save_hypothesis("s1", "hyp_1", "u1", "")
            .unwrap()
            .expect("hypothesis saved");
        assert_eq!(first.hypothesis.title, "Weaker idea");
        store
            .save_hypothesis("s1", "hyp_0", "u1", "design a replication")
            .unwrap()
            .expect("hypothesis saved");
        assert!(store.delete_session("s1", "u1").unwrap());
    }

    let store = SqliteSessionStore::open(&path).unwrap();
    let saved = store.list_saved("u1").unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].hypothesis.id, "hyp_0");
    assert_eq!(saved[0].notes, "design a replication");
    assert_eq!(saved[0].session_id, "s1");
    assert!((saved[0].hypothesis.confidence() - (0.35 * 0.9 + 0.35 * 0.8 + 0.30 * 0.7)).abs() < 1e-9);
    assert_eq!(saved[1].hypothesis.id, "hyp_1");
}

#[test]
fn test_save_requires_owned_session_and_known_hypothesis() {
    let store = SqliteSessionStore::open(":memory:").unwrap();
    store.insert_session(&completed_session("s1", "u1", 1)).unwrap();

    assert!(store.save_hypothesis("s1", "hyp_0", "u2", "").unwrap().is_none());
    assert!(store.save_hypothesis("s1", "hyp_9", "u1", "").unwrap().is_none());
    assert!(store.save_hypothesis("nope", "hyp_0", "u1", "").unwrap().is_none());
    assert!(store.list_saved("u1").unwrap().is_empty());
    assert!(store.list_saved("u2").unwrap().is_empty());
}
