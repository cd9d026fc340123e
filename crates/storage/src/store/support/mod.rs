#![forbid(unsafe_code)]

mod rows_tx;
mod schema;
mod time;

pub(super) use rows_tx::*;
pub(super) use schema::{install_schema, preflight_gate};
pub(super) use time::now_ms;

use super::StoreError;
use rusqlite::{Transaction, params};

pub(super) fn ensure_workspace_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    now_ms: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT OR IGNORE INTO workspaces(workspace, created_at_ms) VALUES (?1, ?2)",
        params![workspace, now_ms],
    )?;
    Ok(())
}
