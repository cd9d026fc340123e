#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::{
    Change, ContainerRow, CreateContainerRequest, RowChange, SqliteStore, StoreError, support,
    validate_text,
};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    pub fn create_container(
        &mut self,
        workspace: &WorkspaceId,
        request: CreateContainerRequest,
    ) -> Result<ContainerRow, StoreError> {
        let name = validate_text(&request.name, "container name must not be empty")?;
        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;

        let position = match request.position {
            Some(position) => position,
            None => support::next_container_position(&tx, workspace.as_str())?,
        };
        let row = support::insert_container_tx(&tx, workspace.as_str(), &name, position, now_ms)?;

        let mut recorder = ChangeRecorder::standalone(&tx, workspace, now_ms);
        recorder.record(
            row.id,
            &Change::Container(RowChange::Insert { row: row.clone() }),
        )?;

        tx.commit()?;
        Ok(row)
    }
}
