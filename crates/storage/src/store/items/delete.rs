#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::{Change, RowChange, SqliteStore, StoreError, support};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Returns false when the item does not exist.
    pub fn delete_item(&mut self, workspace: &WorkspaceId, id: i64) -> Result<bool, StoreError> {
        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;
        let ws = workspace.as_str();

        let Some(current) = support::select_item(&tx, ws, id)? else {
            return Ok(false);
        };
        support::delete_item_tx(&tx, ws, id)?;

        let mut recorder = ChangeRecorder::standalone(&tx, workspace, now_ms);
        recorder.record(id, &Change::Item(RowChange::Delete { row: current }))?;

        tx.commit()?;
        Ok(true)
    }
}
