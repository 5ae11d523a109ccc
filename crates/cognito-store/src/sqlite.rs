//! SQLite session store

use crate::StoreError;
use cognito_domain::session::{SavedHypothesis, SessionSummary, SynthesisSession};
use cognito_domain::traits::SessionStore;
use cognito_domain::{OrchestrationMode, TaskId, TaskStatus};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

const TABLE: &str = "synthesis_sessions";

/// Optional columns the opened database actually has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaCapabilities {
    /// `task_id` column present
    pub task_id: bool,
}

/// SQLite-backed `SessionStore`
///
/// The connection sits behind a mutex so one store can be shared across
/// threads; callers on an async runtime should use `spawn_blocking`.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
    has_task_id: AtomicBool,
}

impl SqliteSessionStore {
    /// Open (or create) a database at `path`
    ///
    /// Use `:memory:` for an in-memory database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Wrap an existing connection, creating the schema if missing
    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(include_str!("schema.sql"))?;

        let caps = detect_capabilities(&conn)?;
        if caps.task_id {
            conn.execute_batch(
                "CREATE INDEX IF NOT EXISTS idx_sessions_task ON synthesis_sessions(task_id);",
            )?;
        } else {
            warn!("{} has no task_id column; task-id lookups are disabled", TABLE);
        }
        info!("Session store ready (task_id support: {})", caps.task_id);

        Ok(Self {
            conn: Mutex::new(conn),
            has_task_id: AtomicBool::new(caps.task_id),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Capabilities negotiated at open
    pub fn capabilities(&self) -> SchemaCapabilities {
        SchemaCapabilities {
            task_id: self.has_task_id.load(Ordering::Acquire),
        }
    }

    /// Whether sessions can be looked up by task id
    pub fn supports_task_ids(&self) -> bool {
        self.capabilities().task_id
    }

    /// Add the `task_id` column to a database that predates it
    ///
    /// Does nothing when the column already exists.
    pub fn migrate_task_id_column(&self) -> Result<(), StoreError> {
        if self.supports_task_ids() {
            return Ok(());
        }
        let conn = self.conn()?;
        conn.execute_batch(
            "ALTER TABLE synthesis_sessions ADD COLUMN task_id TEXT;
             CREATE INDEX IF NOT EXISTS idx_sessions_task ON synthesis_sessions(task_id);",
        )?;
        self.has_task_id.store(true, Ordering::Release);
        info!("Added task_id column to {}", TABLE);
        Ok(())
    }

    fn select_columns(&self) -> &'static str {
        if self.supports_task_ids() {
            "id, task_id, user_id, paper_ids, focus_area, mode, status, output, error, created_at"
        } else {
            "id, NULL, user_id, paper_ids, focus_area, mode, status, output, error, created_at"
        }
    }
}

fn detect_capabilities(conn: &Connection) -> Result<SchemaCapabilities, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map([TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<HashSet<_>, _>>()?;
    debug!("{} columns: {:?}", TABLE, columns);

    Ok(SchemaCapabilities {
        task_id: columns.contains("task_id"),
    })
}

/// Raw column values of one row, decoded outside the rusqlite closure
struct SessionRow {
    id: String,
    task_id: Option<String>,
    user_id: String,
    paper_ids: String,
    focus_area: Option<String>,
    mode: String,
    status: String,
    output: Option<String>,
    error: Option<String>,
    created_at: i64,
}

impl SessionRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            task_id: row.get(1)?,
            user_id: row.get(2)?,
            paper_ids: row.get(3)?,
            focus_area: row.get(4)?,
            mode: row.get(5)?,
            status: row.get(6)?,
            output: row.get(7)?,
            error: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_session(self) -> Result<SynthesisSession, StoreError> {
        let task_id = self
            .task_id
            .map(|raw| {
                raw.parse::<TaskId>()
                    .map_err(|e| StoreError::InvalidData(format!("bad task id {}: {}", raw, e)))
            })
            .transpose()?;
        let mode = self
            .mode
            .parse::<OrchestrationMode>()
            .map_err(StoreError::InvalidData)?;
        let status = self
            .status
            .parse::<TaskStatus>()
            .map_err(StoreError::InvalidData)?;
        let output = self
            .output
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;

        Ok(SynthesisSession {
            id: self.id,
            task_id,
            user_id: self.user_id,
            paper_ids: serde_json::from_str(&self.paper_ids)?,
            focus_area: self.focus_area,
            mode,
            status,
            output,
            error: self.error,
            created_at: u64::try_from(self.created_at).unwrap_or_default(),
        })
    }
}

impl SessionStore for SqliteSessionStore {
    type Error = StoreError;

    fn insert_session(&self, session: &SynthesisSession) -> Result<(), Self::Error> {
        let paper_ids = serde_json::to_string(&session.paper_ids)?;
        let output = session
            .output
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let created_at = i64::try_from(session.created_at)
            .map_err(|_| StoreError::InvalidData("created_at out of range".to_string()))?;
        let conn = self.conn()?;

        if self.supports_task_ids() {
            conn.execute(
                "INSERT OR REPLACE INTO synthesis_sessions
                 (id, task_id, user_id, paper_ids, focus_area, mode, status, output, error, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    session.id,
                    session.task_id.map(|t| t.to_string()),
                    session.user_id,
                    paper_ids,
                    session.focus_area,
                    session.mode.as_str(),
                    session.status.as_str(),
                    output,
                    session.error,
                    created_at,
                ],
            )?;
        } else {
            conn.execute(
                "INSERT OR REPLACE INTO synthesis_sessions
                 (id, user_id, paper_ids, focus_area, mode, status, output, error, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    session.id,
                    session.user_id,
                    paper_ids,
                    session.focus_area,
                    session.mode.as_str(),
                    session.status.as_str(),
                    output,
                    session.error,
                    created_at,
                ],
            )?;
        }

        debug!("Stored session {}", session.id);
        Ok(())
    }

    fn get_session(&self, id: &str) -> Result<Option<SynthesisSession>, Self::Error> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?1", self.select_columns(), TABLE);
        let conn = self.conn()?;
        let row = conn
            .query_row(&sql, [id], SessionRow::from_row)
            .optional()?;
        row.map(SessionRow::into_session).transpose()
    }

    fn find_by_task_id(&self, task_id: TaskId) -> Result<Option<SynthesisSession>, Self::Error> {
        if !self.supports_task_ids() {
            return Ok(None);
        }
        let sql = format!(
            "SELECT {} FROM {} WHERE task_id = ?1 ORDER BY created_at DESC LIMIT 1",
            self.select_columns(),
            TABLE
        );
        let conn = self.conn()?;
        let row = conn
            .query_row(&sql, [task_id.to_string()], SessionRow::from_row)
            .optional()?;
        row.map(SessionRow::into_session).transpose()
    }

    fn list_sessions(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SessionSummary>, Self::Error> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
            self.select_columns(),
            TABLE
        );
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(offset).unwrap_or(i64::MAX);

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![user_id, limit, offset], SessionRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| row.into_session().map(|s| s.summary()))
            .collect()
    }

    fn delete_session(&self, id: &str, user_id: &str) -> Result<bool, Self::Error> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM synthesis_sessions WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(removed > 0)
    }

    fn save_hypothesis(
        &self,
        session_id: &str,
        hypothesis_id: &str,
        user_id: &str,
        notes: &str,
    ) -> Result<Option<SavedHypothesis>, Self::Error> {
        let Some(session) = self.get_session(session_id)? else {
            return Ok(None);
        };
        let Some(saved) = SavedHypothesis::from_session(&session, hypothesis_id, user_id, notes)
        else {
            debug!(
                "Hypothesis {} not saveable from session {} for {}",
                hypothesis_id, session_id, user_id
            );
            return Ok(None);
        };

        let hypothesis = serde_json::to_string(&saved.hypothesis)?;
        let saved_at = i64::try_from(saved.saved_at)
            .map_err(|_| StoreError::InvalidData("saved_at out of range".to_string()))?;
        self.conn()?.execute(
            "INSERT INTO saved_hypotheses (id, user_id, session_id, hypothesis, notes, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                saved.id,
                saved.user_id,
                saved.session_id,
                hypothesis,
                saved.notes,
                saved_at
            ],
        )?;
        debug!("Saved hypothesis {} from session {}", hypothesis_id, session_id);
        Ok(Some(saved))
    }

    fn list_saved(&self, user_id: &str) -> Result<Vec<SavedHypothesis>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, session_id, hypothesis, notes, saved_at FROM saved_hypotheses
             WHERE user_id = ?1 ORDER BY saved_at DESC, rowid DESC",
        )?;
        let rows = stmt
            .query_map([user_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, user_id, session_id, hypothesis, notes, saved_at)| -> Result<_, StoreError> {
                Ok(SavedHypothesis {
                    id,
                    user_id,
                    session_id,
                    hypothesis: serde_json::from_str(&hypothesis)?,
                    notes,
                    saved_at: u64::try_from(saved_at).unwrap_or_default(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_supports_task_ids() {
        let store = SqliteSessionStore::open(":memory:").unwrap();
        assert_eq!(store.capabilities(), SchemaCapabilities { task_id: true });
    }

    #[test]
    fn test_legacy_table_detected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE synthesis_sessions (
                id TEXT PRIMARY KEY, user_id TEXT NOT NULL, paper_ids TEXT NOT NULL,
                focus_area TEXT, mode TEXT NOT NULL DEFAULT 'pipeline', status TEXT NOT NULL,
                output TEXT, error TEXT, created_at INTEGER NOT NULL
            );",
        )
        .unwrap();

        let store = SqliteSessionStore::from_connection(conn).unwrap();
        assert!(!store.supports_task_ids());

        store.migrate_task_id_column().unwrap();
        assert!(store.supports_task_ids());
        // idempotent
        store.migrate_task_id_column().unwrap();
    }
}
