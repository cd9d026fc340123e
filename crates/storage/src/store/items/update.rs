#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::{
    Change, ItemPatch, ItemRow, RowChange, SqliteStore, StoreError, support, validate_text,
};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Applies the fields of `patch` that differ from the stored row; see
    /// [`SqliteStore::update_container`] for the no-op contract.
    pub fn update_item(
        &mut self,
        workspace: &WorkspaceId,
        id: i64,
        mut patch: ItemPatch,
    ) -> Result<Option<ItemRow>, StoreError> {
        if let Some(body) = patch.body.take() {
            patch.body = Some(validate_text(&body, "item body must not be empty")?);
        }

        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;
        let ws = workspace.as_str();

        let Some(current) = support::select_item(&tx, ws, id)? else {
            return Ok(None);
        };
        let Some((old, new)) = patch.diff(&current) else {
            return Ok(Some(current));
        };
        if let Some(container_id) = new.container_id {
            support::ensure_container(&tx, ws, container_id)?;
        }

        support::update_item_tx(&tx, ws, id, &new, now_ms)?;
        let mut recorder = ChangeRecorder::standalone(&tx, workspace, now_ms);
        recorder.record(id, &Change::Item(RowChange::Update { old, new }))?;

        let updated = support::select_item(&tx, ws, id)?
            .ok_or(StoreError::InvalidInput("item vanished during update"))?;
        tx.commit()?;
        Ok(Some(updated))
    }
}
