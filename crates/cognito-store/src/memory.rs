//! In-memory session store

use crate::StoreError;
use cognito_domain::session::{SavedHypothesis, SessionSummary, SynthesisSession};
use cognito_domain::traits::SessionStore;
use cognito_domain::TaskId;
use std::collections::HashMap;
use std::sync::RwLock;

/// Session store backed by a process-local map
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SynthesisSession>>,
    saved: RwLock<Vec<SavedHypothesis>>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or_default()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessionStore {
    type Error = StoreError;

    fn insert_session(&self, session: &SynthesisSession) -> Result<(), Self::Error> {
        self.sessions
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(session.id.clone(), session.clone());
        Ok(())
    }

    fn get_session(&self, id: &str) -> Result<Option<SynthesisSession>, Self::Error> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions.get(id).cloned())
    }

    fn find_by_task_id(&self, task_id: TaskId) -> Result<Option<SynthesisSession>, Self::Error> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sessions
            .values()
            .filter(|s| s.task_id == Some(task_id))
            .max_by_key(|s| s.created_at)
            .cloned())
    }

    fn list_sessions(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SessionSummary>, Self::Error> {
        let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
        let mut owned: Vec<&SynthesisSession> =
            sessions.values().filter(|s| s.user_id == user_id).collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(owned
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(SynthesisSession::summary)
            .collect())
    }

    fn delete_session(&self, id: &str, user_id: &str) -> Result<bool, Self::Error> {
        let mut sessions = self.sessions.write().map_err(|_| StoreError::Poisoned)?;
        match sessions.get(id) {
            Some(s) if s.user_id == user_id => {
                sessions.remove(id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn save_hypothesis(
        &self,
        session_id: &str,
        hypothesis_id: &str,
        user_id: &str,
        notes: &str,
    ) -> Result<Option<SavedHypothesis>, Self::Error> {
        let saved = {
            let sessions = self.sessions.read().map_err(|_| StoreError::Poisoned)?;
            sessions
                .get(session_id)
                .and_then(|s| SavedHypothesis::from_session(s, hypothesis_id, user_id, notes))
        };
        if let Some(saved) = &saved {
            self.saved
                .write()
                .map_err(|_| StoreError::Poisoned)?
                .push(saved.clone());
        }
        Ok(saved)
    }

    fn list_saved(&self, user_id: &str) -> Result<Vec<SavedHypothesis>, Self::Error> {
        let saved = self.saved.read().map_err(|_| StoreError::Poisoned)?;
        // reversed insertion order breaks ties between saves in the same second
        let mut owned: Vec<SavedHypothesis> = saved
            .iter()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(owned)
    }
}
