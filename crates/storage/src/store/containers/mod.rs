#![forbid(unsafe_code)]

mod create;
mod delete;
mod update;

use super::{ContainerRow, SqliteStore, StoreError, support};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    pub fn get_container(
        &self,
        workspace: &WorkspaceId,
        id: i64,
    ) -> Result<Option<ContainerRow>, StoreError> {
        support::select_container(&self.conn, workspace.as_str(), id)
    }

    /// Containers ordered by position, then id.
    pub fn list_containers(&self, workspace: &WorkspaceId) -> Result<Vec<ContainerRow>, StoreError> {
        support::list_containers(&self.conn, workspace.as_str())
    }
}
