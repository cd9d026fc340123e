#![forbid(unsafe_code)]

use super::super::{ChangeLogEntry, HistoryGroup, StoreError};
use super::entry::{ENTRY_COLUMNS, raw_entry_from_row};
use rusqlite::{Connection, OptionalExtension, params};
use tl_core::history::{BatchRef, Direction};
use tl_core::ids::WorkspaceId;

/// The group `direction` would replay next, or `None` when that stack is empty.
///
/// Undo takes the newest active entry. Undone entries always form the tail of the log, so the
/// group undone most recently is the one holding the lowest undone id, and redo starts there.
pub(in crate::store) fn next_group(
    conn: &Connection,
    workspace: &WorkspaceId,
    direction: Direction,
) -> Result<Option<HistoryGroup>, StoreError> {
    match direction {
        Direction::Undo => latest_active_group(conn, workspace),
        Direction::Redo => latest_undone_group(conn, workspace),
    }
}

pub(in crate::store) fn latest_active_group(
    conn: &Connection,
    workspace: &WorkspaceId,
) -> Result<Option<HistoryGroup>, StoreError> {
    let head = select_head_entry(
        conn,
        workspace,
        "SELECT id, batch_id FROM changelog WHERE workspace=?1 AND active=1 ORDER BY id DESC LIMIT 1",
    )?;
    match head {
        Some((id, batch_id)) => load_group(conn, workspace, id, batch_id, true).map(Some),
        None => Ok(None),
    }
}

pub(in crate::store) fn latest_undone_group(
    conn: &Connection,
    workspace: &WorkspaceId,
) -> Result<Option<HistoryGroup>, StoreError> {
    let head = select_head_entry(
        conn,
        workspace,
        "SELECT id, batch_id FROM changelog WHERE workspace=?1 AND active=0 ORDER BY id ASC LIMIT 1",
    )?;
    match head {
        Some((id, batch_id)) => load_group(conn, workspace, id, batch_id, false).map(Some),
        None => Ok(None),
    }
}

fn select_head_entry(
    conn: &Connection,
    workspace: &WorkspaceId,
    sql: &str,
) -> Result<Option<(i64, Option<String>)>, StoreError> {
    Ok(conn
        .query_row(sql, params![workspace.as_str()], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?))
        })
        .optional()?)
}

fn load_group(
    conn: &Connection,
    workspace: &WorkspaceId,
    head_id: i64,
    batch_id: Option<String>,
    active: bool,
) -> Result<HistoryGroup, StoreError> {
    let entries = match batch_id.as_deref() {
        Some(batch_id) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {ENTRY_COLUMNS} FROM changelog \
                 WHERE workspace=?1 AND active=?2 AND batch_id=?3 ORDER BY id ASC"
            ))?;
            let rows = stmt.query_map(
                params![workspace.as_str(), i64::from(active), batch_id],
                raw_entry_from_row,
            )?;
            let entries = rows
                .map(|raw| -> Result<ChangeLogEntry, StoreError> { raw?.decode() })
                .collect::<Result<Vec<_>, _>>()?;
            entries
        }
        None => {
            let raw = conn.query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM changelog WHERE workspace=?1 AND id=?2"),
                params![workspace.as_str(), head_id],
                raw_entry_from_row,
            )?;
            vec![raw.decode()?]
        }
    };

    let batch = match entries.first() {
        Some(entry) => entry.batch.clone(),
        None => BatchRef::None,
    };
    Ok(HistoryGroup { batch, entries })
}
