//! Cognito Storage Layer
//!
//! Implements the `SessionStore` trait from `cognito-domain`.
//!
//! # Backends
//!
//! - [`SqliteSessionStore`]: persistent sessions in SQLite; the output
//!   payload is kept as JSON text
//! - [`MemorySessionStore`]: process-local map, for tests and ephemeral runs
//!
//! # Schema drift
//!
//! Older databases may lack the optional `task_id` column. The SQLite store
//! inspects the table once when it opens and records what the schema
//! supports. Writes then omit the column and task-id lookups report
//! `None`, instead of failing every write. [`SqliteSessionStore::migrate_task_id_column`]
//! adds the column to such a database in place.
//!
//! # Examples
//!
//! ```no_run
//! use cognito_store::SqliteSessionStore;
//!
//! let store = SqliteSessionStore::open("sessions.db").unwrap();
//! assert!(store.supports_task_ids());
//! ```

#![warn(missing_docs)]

mod memory;
mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::{SchemaCapabilities, SqliteSessionStore};

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Payload could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A lock guarding the backend was poisoned
    #[error("Store lock poisoned")]
    Poisoned,
}
