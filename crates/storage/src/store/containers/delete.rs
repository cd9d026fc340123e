#![forbid(unsafe_code)]

use super::super::changelog::ChangeRecorder;
use super::super::{
    Change, ContainerDeletePolicy, ContainerDeletion, ItemFilter, ItemPatch, RowChange,
    SqliteStore, StoreError, support,
};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Deletes a container and deals with its items according to `policy`, as one batch.
    ///
    /// Child entries are recorded before the container's own delete entry. Returns `None`
    /// when the container does not exist.
    pub fn delete_container(
        &mut self,
        workspace: &WorkspaceId,
        id: i64,
        policy: ContainerDeletePolicy,
    ) -> Result<Option<ContainerDeletion>, StoreError> {
        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;
        let ws = workspace.as_str();

        let Some(container) = support::select_container(&tx, ws, id)? else {
            return Ok(None);
        };
        if policy == ContainerDeletePolicy::ReassignTo(id) {
            return Err(StoreError::InvalidInput(
                "cannot reassign items to the container being deleted",
            ));
        }
        let mut children = support::list_items(
            &tx,
            ws,
            &ItemFilter {
                container_id: Some(id),
                completed: None,
            },
        )?;
        children.sort_by_key(|item| item.id);

        let mut recorder = ChangeRecorder::batch(&tx, workspace, now_ms);
        match policy {
            ContainerDeletePolicy::DeleteChildren => {
                for item in children.iter() {
                    support::delete_item_tx(&tx, ws, item.id)?;
                    recorder.record(
                        item.id,
                        &Change::Item(RowChange::Delete { row: item.clone() }),
                    )?;
                }
            }
            ContainerDeletePolicy::ReassignTo(target) => {
                support::ensure_container(&tx, ws, target)?;
                for item in children.iter() {
                    let old = ItemPatch {
                        container_id: Some(item.container_id),
                        ..ItemPatch::default()
                    };
                    let new = ItemPatch {
                        container_id: Some(target),
                        ..ItemPatch::default()
                    };
                    support::update_item_tx(&tx, ws, item.id, &new, now_ms)?;
                    recorder.record(item.id, &Change::Item(RowChange::Update { old, new }))?;
                }
            }
        }

        support::delete_container_tx(&tx, ws, id)?;
        recorder.record(
            id,
            &Change::Container(RowChange::Delete {
                row: container.clone(),
            }),
        )?;
        let batch = recorder.finish();

        tx.commit()?;
        tracing::debug!(
            workspace = %workspace,
            container_id = id,
            children = children.len(),
            ?policy,
            "container deleted"
        );
        Ok(Some(ContainerDeletion {
            container,
            item_ids: children.into_iter().map(|item| item.id).collect(),
            batch,
        }))
    }
}
