#![forbid(unsafe_code)]

use super::super::{Change, StoreError};
use rusqlite::{Transaction, params};
use tl_core::history::{BatchId, BatchRef};
use tl_core::ids::WorkspaceId;

/// Appends change log entries for one user-facing action inside the action's transaction.
///
/// The undone tail is pruned exactly once, right before the first entry is written, so an
/// action that ends up recording nothing leaves the redo stack alone.
pub(in crate::store) struct ChangeRecorder<'a, 'conn> {
    tx: &'a Transaction<'conn>,
    workspace: &'a WorkspaceId,
    batch: BatchRef,
    now_ms: i64,
    recorded: usize,
}

impl<'a, 'conn> ChangeRecorder<'a, 'conn> {
    pub(in crate::store) fn standalone(
        tx: &'a Transaction<'conn>,
        workspace: &'a WorkspaceId,
        now_ms: i64,
    ) -> Self {
        Self {
            tx,
            workspace,
            batch: BatchRef::None,
            now_ms,
            recorded: 0,
        }
    }

    pub(in crate::store) fn batch(
        tx: &'a Transaction<'conn>,
        workspace: &'a WorkspaceId,
        now_ms: i64,
    ) -> Self {
        Self {
            tx,
            workspace,
            batch: BatchRef::Batch(BatchId::generate()),
            now_ms,
            recorded: 0,
        }
    }

    pub(in crate::store) fn record(
        &mut self,
        entity_id: i64,
        change: &Change,
    ) -> Result<i64, StoreError> {
        if self.recorded == 0 {
            prune_undone_tail_tx(self.tx, self.workspace)?;
        }
        let entry_id = record_change_tx(
            self.tx,
            self.workspace,
            entity_id,
            change,
            &self.batch,
            self.now_ms,
        )?;
        self.recorded += 1;
        Ok(entry_id)
    }

    /// The batch tag, or `BatchRef::None` when nothing was recorded under it.
    pub(in crate::store) fn finish(self) -> BatchRef {
        if self.recorded == 0 {
            BatchRef::None
        } else {
            self.batch
        }
    }
}

pub(in crate::store) fn record_change_tx(
    tx: &Transaction<'_>,
    workspace: &WorkspaceId,
    entity_id: i64,
    change: &Change,
    batch: &BatchRef,
    now_ms: i64,
) -> Result<i64, StoreError> {
    let payload_json = change.payload_json()?;
    tx.execute(
        "INSERT INTO changelog(workspace, active, batch_id, op, entity_kind, entity_id, payload_json, ts_ms) \
         VALUES (?1, 1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            workspace.as_str(),
            batch.as_column(),
            change.op().as_str(),
            change.kind().as_str(),
            entity_id,
            payload_json,
            now_ms
        ],
    )?;
    let entry_id = tx.last_insert_rowid();
    tracing::debug!(
        workspace = %workspace,
        entry_id,
        op = %change.op(),
        kind = %change.kind(),
        entity_id,
        batch = ?batch.as_column(),
        "change recorded"
    );
    Ok(entry_id)
}

/// Drops every undone entry of the workspace: once a new action is recorded, the abandoned
/// redo history can never be reached again.
pub(in crate::store) fn prune_undone_tail_tx(
    tx: &Transaction<'_>,
    workspace: &WorkspaceId,
) -> Result<usize, StoreError> {
    let pruned = tx.execute(
        "DELETE FROM changelog WHERE workspace=?1 AND active=0",
        params![workspace.as_str()],
    )?;
    if pruned > 0 {
        tracing::debug!(workspace = %workspace, pruned, "undone tail pruned");
    }
    Ok(pruned)
}
