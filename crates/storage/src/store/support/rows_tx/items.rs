#![forbid(unsafe_code)]

use super::super::super::{ItemFilter, ItemPatch, ItemRow, StoreError};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params, params_from_iter};
use tl_core::model::Priority;

const ITEM_COLUMNS: &str = "id, container_id, body, completed, priority, position, due_at_ms, created_at_ms, updated_at_ms";

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<ItemRow> {
    Ok(ItemRow {
        id: row.get(0)?,
        container_id: row.get(1)?,
        body: row.get(2)?,
        completed: row.get::<_, i64>(3)? != 0,
        priority: Priority::new(row.get(4)?),
        position: row.get(5)?,
        due_at_ms: row.get(6)?,
        created_at_ms: row.get(7)?,
        updated_at_ms: row.get(8)?,
    })
}

pub(in crate::store) fn select_item(
    conn: &Connection,
    workspace: &str,
    id: i64,
) -> Result<Option<ItemRow>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM items WHERE workspace=?1 AND id=?2"),
            params![workspace, id],
            item_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn list_items(
    conn: &Connection,
    workspace: &str,
    filter: &ItemFilter,
) -> Result<Vec<ItemRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ITEM_COLUMNS} FROM items \
         WHERE workspace=?1 AND (?2 IS NULL OR container_id=?2) AND (?3 IS NULL OR completed=?3) \
         ORDER BY container_id ASC, position ASC, id ASC"
    ))?;
    let completed = filter.completed.map(i64::from);
    let rows = stmt.query_map(
        params![workspace, filter.container_id, completed],
        item_from_row,
    )?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(in crate::store) fn next_item_position(
    conn: &Connection,
    workspace: &str,
    container_id: i64,
) -> Result<i64, StoreError> {
    Ok(conn.query_row(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM items WHERE workspace=?1 AND container_id=?2",
        params![workspace, container_id],
        |row| row.get::<_, i64>(0),
    )?)
}

pub(in crate::store) struct NewItemRow<'a> {
    pub container_id: i64,
    pub body: &'a str,
    pub priority: Priority,
    pub position: i64,
    pub due_at_ms: Option<i64>,
}

pub(in crate::store) fn insert_item_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    new: NewItemRow<'_>,
    now_ms: i64,
) -> Result<ItemRow, StoreError> {
    tx.execute(
        "INSERT INTO items(workspace, container_id, body, completed, priority, position, due_at_ms, created_at_ms, updated_at_ms) \
         VALUES (?1, ?2, ?3, 0, ?4, ?5, ?6, ?7, ?7)",
        params![
            workspace,
            new.container_id,
            new.body,
            new.priority.value(),
            new.position,
            new.due_at_ms,
            now_ms
        ],
    )?;
    Ok(ItemRow {
        id: tx.last_insert_rowid(),
        container_id: new.container_id,
        body: new.body.to_string(),
        completed: false,
        priority: new.priority,
        position: new.position,
        due_at_ms: new.due_at_ms,
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    })
}

/// Re-inserts a previously deleted row under its original id.
pub(in crate::store) fn restore_item_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    row: &ItemRow,
    now_ms: i64,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO items(id, workspace, container_id, body, completed, priority, position, due_at_ms, created_at_ms, updated_at_ms) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            row.id,
            workspace,
            row.container_id,
            row.body,
            i64::from(row.completed),
            row.priority.value(),
            row.position,
            row.due_at_ms,
            row.created_at_ms,
            now_ms
        ],
    )?;
    Ok(())
}

/// Writes the fields present in `patch`. Returns false when the row does not exist.
pub(in crate::store) fn update_item_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    id: i64,
    patch: &ItemPatch,
    now_ms: i64,
) -> Result<bool, StoreError> {
    let mut sets = vec!["updated_at_ms=?"];
    let mut values = vec![Value::Integer(now_ms)];
    if let Some(container_id) = patch.container_id {
        sets.push("container_id=?");
        values.push(Value::Integer(container_id));
    }
    if let Some(body) = patch.body.as_ref() {
        sets.push("body=?");
        values.push(Value::Text(body.clone()));
    }
    if let Some(completed) = patch.completed {
        sets.push("completed=?");
        values.push(Value::Integer(i64::from(completed)));
    }
    if let Some(priority) = patch.priority {
        sets.push("priority=?");
        values.push(Value::Integer(priority.value()));
    }
    if let Some(position) = patch.position {
        sets.push("position=?");
        values.push(Value::Integer(position));
    }
    if let Some(due_at_ms) = patch.due_at_ms {
        sets.push("due_at_ms=?");
        values.push(due_at_ms.map_or(Value::Null, Value::Integer));
    }
    values.push(Value::Text(workspace.to_string()));
    values.push(Value::Integer(id));

    let changed = tx.execute(
        &format!(
            "UPDATE items SET {} WHERE workspace=? AND id=?",
            sets.join(", ")
        ),
        params_from_iter(values),
    )?;
    Ok(changed > 0)
}

pub(in crate::store) fn delete_item_tx(
    tx: &Transaction<'_>,
    workspace: &str,
    id: i64,
) -> Result<bool, StoreError> {
    let changed = tx.execute(
        "DELETE FROM items WHERE workspace=?1 AND id=?2",
        params![workspace, id],
    )?;
    Ok(changed > 0)
}
