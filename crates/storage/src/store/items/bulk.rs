#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::{
    BulkItemEdit, BulkOutcome, Change, RowChange, SqliteStore, StoreError, support,
};
use std::collections::BTreeSet;
use tl_core::ids::WorkspaceId;
use tl_core::model::Priority;

impl SqliteStore {
    /// Applies one single-field edit to every listed item as one batch.
    ///
    /// Ids are deduplicated and processed in ascending order. Items that do not exist are
    /// reported as missing, items already holding the value as unchanged; neither is logged.
    pub fn bulk_update_items(
        &mut self,
        workspace: &WorkspaceId,
        ids: &[i64],
        edit: BulkItemEdit,
    ) -> Result<BulkOutcome, StoreError> {
        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;
        let ws = workspace.as_str();

        if let BulkItemEdit::MoveTo(container_id) = edit {
            support::ensure_container(&tx, ws, container_id)?;
        }

        let patch = edit.patch();
        let mut recorder = ChangeRecorder::batch(&tx, workspace, now_ms);
        let mut changed = Vec::new();
        let mut unchanged = Vec::new();
        let mut missing = Vec::new();

        for id in ids.iter().copied().collect::<BTreeSet<i64>>() {
            let Some(current) = support::select_item(&tx, ws, id)? else {
                missing.push(id);
                continue;
            };
            let Some((old, new)) = patch.diff(&current) else {
                unchanged.push(id);
                continue;
            };
            support::update_item_tx(&tx, ws, id, &new, now_ms)?;
            recorder.record(id, &Change::Item(RowChange::Update { old, new }))?;
            let updated = support::select_item(&tx, ws, id)?
                .ok_or(StoreError::InvalidInput("item vanished during update"))?;
            changed.push(updated);
        }

        let batch = recorder.finish();
        tx.commit()?;
        tracing::debug!(
            workspace = %workspace,
            ?edit,
            changed = changed.len(),
            unchanged = unchanged.len(),
            missing = missing.len(),
            "bulk item update"
        );
        Ok(BulkOutcome {
            batch,
            changed,
            unchanged,
            missing,
        })
    }

    pub fn move_items(
        &mut self,
        workspace: &WorkspaceId,
        ids: &[i64],
        container_id: i64,
    ) -> Result<BulkOutcome, StoreError> {
        self.bulk_update_items(workspace, ids, BulkItemEdit::MoveTo(container_id))
    }

    pub fn set_items_completed(
        &mut self,
        workspace: &WorkspaceId,
        ids: &[i64],
        completed: bool,
    ) -> Result<BulkOutcome, StoreError> {
        self.bulk_update_items(workspace, ids, BulkItemEdit::Completed(completed))
    }

    pub fn set_items_priority(
        &mut self,
        workspace: &WorkspaceId,
        ids: &[i64],
        priority: Priority,
    ) -> Result<BulkOutcome, StoreError> {
        self.bulk_update_items(workspace, ids, BulkItemEdit::Priority(priority))
    }

    pub fn set_items_due(
        &mut self,
        workspace: &WorkspaceId,
        ids: &[i64],
        due_at_ms: Option<i64>,
    ) -> Result<BulkOutcome, StoreError> {
        self.bulk_update_items(workspace, ids, BulkItemEdit::Due(due_at_ms))
    }
}
