#![forbid(unsafe_code)]

use super::super::super::{ContainerPatch, ContainerRow, StoreError};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params, params_from_iter};

const CONTAINER_COLUMNS: &str = "id, name, position, created_at_ms, updated_at_ms";

fn container_from_row(row: &Row<'_>) -> rusqlite::Result<ContainerRow> {
    Ok(ContainerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        position: row.get(2)?,
        created_at_ms: row.get(3)?,
        updated_at_ms: row.get(4)?,
    })
}

pub(in crate::store) fn select_container(
    conn: &Connection,
    workspace: &str,
    id: i64,
) -> Result<Option<ContainerRow>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {CONTAINER_COLUMNS} FROM containers WHERE workspace=?1 AND id=?2"),
            params![workspace, id],
            container_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn ensure_container(
    conn: &Connection,
    workspace: &str,
    id: i64,
) -> Result<ContainerRow, StoreError> {
    select_container(conn, workspace, id)?.ok_or(StoreError::UnknownContainer(id))
}

pub(in crate::store) fn list_containers(
    conn: &Connection,
    workspace: &str,
) -> Result<Vec<ContainerRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTAINER_COLUMNS} FROM containers WHERE workspace=?1 ORDER BY position ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![workspace], container_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(in crate::store) fn next_container_position(
    conn: &Connection,
    workspace: &str,
) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM containers WHERE workspace=?1",
        params![workspace],
        |row| row.get::<_, i64>(0),
    )?)
}

pub(in crate::store) fn insert_container_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    name: &str,
    position: i64,
    now_ms: i64,
) -> Result<ContainerRow, StoreError> {
    tx.execute(
        "INSERT INTO containers(workspace, name, position, created_at_ms, updated_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?4)",
        params![workspace, name, position, now_ms],
    )?;
    Ok(ContainerRow {
        id: tx.last_insert_rowid(),
        name: name.to_string(),
        position,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    })
}

/// Re-inserts a previously deleted row under its original id.
pub(in crate::store) fn restore_container_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    row: &ContainerRow,
    now_ms: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO containers(id, workspace, name, position, created_at_ms, updated_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            row.id,
            workspace,
            row.name,
            row.position,
            row.created_at_ms,
            now_ms
        ],
    )?;
    Ok(())
}

/// Writes the fields present in `patch`. Returns false when the row does not exist.
pub(in crate::store) fn update_container_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    id: i64,
    patch: &ContainerPatch,
    now_ms: i64,
) -> Result<bool, StoreError> {
    let mut sets = vec!["updated_at_ms=?"];
    let mut values = vec![Value::Integer(now_ms)];
    if let Some(name) = patch.name.as_ref() {
        sets.push("name=?");
        values.push(Value::Text(name.clone()));
    }
    if let Some(position) = patch.position {
        sets.push("position=?");
        values.push(Value::Integer(position));
    }
    values.push(Value::Text(workspace.to_string()));
    values.push(Value::Integer(id));

    let changed = tx.execute(
        &format!(
            "UPDATE containers SET {} WHERE workspace=? AND id=?",
            sets.join(", ")
        ),
        params_from_iter(values),
    )?;
    Ok(changed > 0)
}

pub(in crate::store) fn delete_container_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    id: i64,
) -> Result<bool, StoreError> {
    let changed = tx.execute(
        "DELETE FROM containers WHERE workspace=?1 AND id=?2",
        params![workspace, id],
    )?;
    Ok(changed > 0)
}
