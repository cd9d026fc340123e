#![forbid(unsafe_code)]

use crate::time_fmt::ms_to_rfc3339;
use serde_json::{Value, json};
use tl_storage::{
    BulkOutcome, Change, ChangeLogEntry, ContainerDeletion, ContainerRow, HistoryOutcome, ItemRow,
};

pub(crate) fn container(row: &ContainerRow) -> Value {
    json!({
        "type": "container",
        "id": row.id,
        "name": row.name,
        "position": row.position,
        "created_at": ms_to_rfc3339(row.created_at_ms),
        "updated_at": ms_to_rfc3339(row.updated_at_ms),
    })
}

pub(crate) fn item(row: &ItemRow) -> Value {
    json!({
        "type": "item",
        "id": row.id,
        "container_id": row.container_id,
        "body": row.body,
        "completed": row.completed,
        "priority": row.priority.value(),
        "priority_level": row.priority.level().as_str(),
        "position": row.position,
        "due_at": row.due_at_ms.map(ms_to_rfc3339),
        "created_at": ms_to_rfc3339(row.created_at_ms),
        "updated_at": ms_to_rfc3339(row.updated_at_ms),
    })
}

pub(crate) fn deletion(deleted: &ContainerDeletion) -> Value {
    json!({
        "type": "container_deleted",
        "id": deleted.container.id,
        "item_ids": deleted.item_ids,
        "batch_id": deleted.batch.as_column(),
    })
}

pub(crate) fn item_deleted(id: i64, deleted: bool) -> Value {
    json!({ "type": "item_deleted", "id": id, "deleted": deleted })
}

pub(crate) fn bulk(outcome: &BulkOutcome) -> Value {
    json!({
        "type": "bulk",
        "batch_id": outcome.batch.as_column(),
        "changed": outcome.changed.iter().map(|row| row.id).collect::<Vec<_>>(),
        "unchanged": outcome.unchanged,
        "missing": outcome.missing,
    })
}

pub(crate) fn history_outcome(outcome: &HistoryOutcome) -> Value {
    match outcome {
        HistoryOutcome::Applied { direction, group } => json!({
            "type": direction.as_str(),
            "applied": true,
            "batch_id": group.batch.as_column(),
            "entry_ids": group.entries.iter().map(|entry| entry.id).collect::<Vec<_>>(),
        }),
        HistoryOutcome::Empty => json!({ "type": "history", "applied": false, "reason": "empty" }),
        HistoryOutcome::Rejected { direction, reason } => json!({
            "type": direction.as_str(),
            "applied": false,
            "reason": reason.to_string(),
        }),
    }
}

pub(crate) fn entry(entry: &ChangeLogEntry) -> Result<Value, serde_json::Error> {
    let payload = match &entry.change {
        Change::Container(change) => serde_json::to_value(change)?,
        Change::Item(change) => serde_json::to_value(change)?,
    };
    Ok(json!({
        "type": "entry",
        "id": entry.id,
        "active": entry.active,
        "batch_id": entry.batch.as_column(),
        "kind": entry.kind().as_str(),
        "op": entry.op().as_str(),
        "entity_id": entry.entity_id,
        "payload": payload,
        "ts": ms_to_rfc3339(entry.ts_ms),
    }))
}

pub(crate) fn status(can_undo: bool, can_redo: bool) -> Value {
    json!({ "type": "status", "can_undo": can_undo, "can_redo": can_redo })
}
