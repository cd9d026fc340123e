#![forbid(unsafe_code)]

mod changelog;
mod containers;
mod error;
mod items;
mod requests;
mod support;
mod types;

pub use error::{ReplayRejection, StoreError};
pub use requests::*;
pub use types::*;

use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tl_core::ids::WorkspaceId;

const DB_FILE_NAME: &str = "tasklog.db";

/// Containers, items and their change log in one SQLite database.
///
/// Every mutating method runs in a single `BEGIN IMMEDIATE` transaction that covers the
/// row change and its change log entries, so a failure never leaves one without the other.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::init(conn, Some(storage_dir))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, storage_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        support::preflight_gate(&conn)?;
        support::install_schema(&conn, support::now_ms())?;
        tracing::debug!(path = ?storage_dir, "store opened");
        Ok(Self { conn, storage_dir })
    }

    /// `None` for in-memory stores.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    fn begin_write(&mut self, workspace: &WorkspaceId, now_ms: i64) -> Result<Transaction<'_>, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        support::ensure_workspace_tx(&tx, workspace.as_str(), now_ms)?;
        Ok(tx)
    }
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.code == ErrorCode::ConstraintViolation
                || message.as_deref().is_some_and(|value| {
                    value.contains("UNIQUE constraint failed")
                        || value.contains("PRIMARY KEY constraint failed")
                        || value.contains("FOREIGN KEY constraint failed")
                })
        }
        _ => false,
    }
}

fn validate_text(value: &str, empty_message: &'static str) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidInput(empty_message));
    }
    Ok(trimmed.to_string())
}
