#![forbid(unsafe_code)]

use super::super::{Change, ChangeLogEntry, StoreError};
use rusqlite::Row;
use tl_core::history::{BatchRef, OpKind};
use tl_core::model::EntityKind;

pub(super) const ENTRY_COLUMNS: &str =
    "id, active, batch_id, op, entity_kind, entity_id, payload_json, ts_ms";

/// Column values as stored; decoded separately so a malformed payload surfaces as
/// `CorruptEntry` instead of a generic SQLite conversion error.
pub(super) struct RawEntry {
    id: i64,
    active: bool,
    batch_id: Option<String>,
    op: String,
    entity_kind: String,
    entity_id: i64,
    payload_json: String,
    ts_ms: i64,
}

pub(super) fn raw_entry_from_row(row: &Row<'_>) -> rusqlite::Result<RawEntry> {
    Ok(RawEntry {
        id: row.get(0)?,
        active: row.get::<_, i64>(1)? != 0,
        batch_id: row.get(2)?,
        op: row.get(3)?,
        entity_kind: row.get(4)?,
        entity_id: row.get(5)?,
        payload_json: row.get(6)?,
        ts_ms: row.get(7)?,
    })
}

impl RawEntry {
    pub(super) fn decode(self) -> Result<ChangeLogEntry, StoreError> {
        let corrupt = |reason: String| StoreError::CorruptEntry {
            entry_id: self.id,
            reason,
        };

        let op = OpKind::parse(&self.op).ok_or_else(|| corrupt(format!("unknown op {:?}", self.op)))?;
        let kind = EntityKind::parse(&self.entity_kind)
            .ok_or_else(|| corrupt(format!("unknown entity kind {:?}", self.entity_kind)))?;
        let batch = BatchRef::from_column(self.batch_id.clone())
            .map_err(|err| corrupt(err.message().to_string()))?;
        let change = Change::from_payload_json(kind, &self.payload_json)
            .map_err(|err| corrupt(format!("payload: {err}")))?;
        if change.op() != op {
            return Err(corrupt(format!(
                "payload op {} does not match column op {op}",
                change.op()
            )));
        }

        Ok(ChangeLogEntry {
            id: self.id,
            active: self.active,
            batch,
            entity_id: self.entity_id,
            change,
            ts_ms: self.ts_ms,
        })
    }
}
