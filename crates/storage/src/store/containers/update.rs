#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::{
    Change, ContainerPatch, ContainerRow, RowChange, SqliteStore, StoreError, support,
    validate_text,
};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Applies the fields of `patch` that differ from the stored row. A patch that changes
    /// nothing returns the current row and leaves the change log untouched.
    pub fn update_container(
        &mut self,
        workspace: &WorkspaceId,
        id: i64,
        mut patch: ContainerPatch,
    ) -> Result<Option<ContainerRow>, StoreError> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(validate_text(&name, "container name must not be empty")?);
        }

        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;

        let Some(current) = support::select_container(&tx, workspace.as_str(), id)? else {
            return Ok(None);
        };
        let Some((old, new)) = patch.diff(&current) else {
            return Ok(Some(current));
        };

        support::update_container_tx(&tx, workspace.as_str(), id, &new, now_ms)?;
        let mut recorder = ChangeRecorder::standalone(&tx, workspace, now_ms);
        recorder.record(id, &Change::Container(RowChange::Update { old, new }))?;

        let updated = support::ensure_container(&tx, workspace.as_str(), id)?;
        tx.commit()?;
        Ok(Some(updated))
    }
}
