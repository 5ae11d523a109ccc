//! Command implementations.

pub mod sessions;
pub mod synthesize;
pub mod task;

pub use self::sessions::execute_sessions;
pub use self::synthesize::execute_synthesize;
pub use self::task::{execute_result, execute_status};

use crate::config::AppConfig;
use crate::error::{CliError, Result};
use cognito_domain::TaskId;
use cognito_store::SqliteSessionStore;
use cognito_tasks::TaskTracker;
use std::sync::Arc;
use tracing::debug;

/// Open the configured session database.
pub fn open_store(config: &AppConfig) -> Result<Arc<SqliteSessionStore>> {
    let path = config.store_path()?;
    debug!("Opening session store at {}", path.display());
    Ok(Arc::new(SqliteSessionStore::open(&path)?))
}

/// Tracker over the configured session database.
pub fn open_tracker(config: &AppConfig) -> Result<TaskTracker<SqliteSessionStore>> {
    Ok(TaskTracker::new(open_store(config)?, config.tracker.clone())?)
}

/// Parse a task id argument.
pub fn parse_task_id(raw: &str) -> Result<TaskId> {
    raw.trim()
        .parse()
        .map_err(|e| CliError::InvalidInput(format!("'{}' is not a task id: {}", raw, e)))
}
