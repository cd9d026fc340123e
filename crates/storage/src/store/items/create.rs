#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::support::NewItemRow;
use super::super::{
    Change, CreateItemRequest, ItemRow, RowChange, SqliteStore, StoreError, support,
    validate_text,
};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Fails with `UnknownContainer` when the owning container does not exist.
    pub fn create_item(
        &mut self,
        workspace: &WorkspaceId,
        request: CreateItemRequest,
    ) -> Result<ItemRow, StoreError> {
        let body = validate_text(&request.body, "item body must not be empty")?;
        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;
        let ws = workspace.as_str();

        support::ensure_container(&tx, ws, request.container_id)?;
        let position = match request.position {
            Some(position) => position,
            None => support::next_item_position(&tx, ws, request.container_id)?,
        };
        let row = support::insert_item_tx(
            &tx,
            ws,
            NewItemRow {
                container_id: request.container_id,
                body: &body,
                priority: request.priority,
                position,
                due_at_ms: request.due_at_ms,
            },
            now_ms,
        )?;

        let mut recorder = ChangeRecorder::standalone(&tx, workspace, now_ms);
        recorder.record(row.id, &Change::Item(RowChange::Insert { row: row.clone() }))?;

        tx.commit()?;
        Ok(row)
    }
}
