#![forbid(unsafe_code)]

mod bulk;
mod create;
mod delete;
mod update;

use super::{ItemFilter, ItemRow, SqliteStore, StoreError, support};
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    pub fn get_item(&self, workspace: &WorkspaceId, id: i64) -> Result<Option<ItemRow>, StoreError> {
        support::select_item(&self.conn, workspace.as_str(), id)
    }

    /// Items matching `filter`, ordered by container, position, then id.
    pub fn list_items(
        &self,
        workspace: &WorkspaceId,
        filter: &ItemFilter,
    ) -> Result<Vec<ItemRow>, StoreError> {
        support::list_items(&self.conn, workspace.as_str(), filter)
    }
}
