#![forbid(unsafe_code)]

use super::super::{ChangeLogEntry, SqliteStore, StoreError};
use super::cursor;
use super::entry::{ENTRY_COLUMNS, raw_entry_from_row};
use rusqlite::params;
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Change log of the workspace, newest first, undone entries included.
    pub fn history(
        &self,
        workspace: &WorkspaceId,
        limit: usize,
    ) -> Result<Vec<ChangeLogEntry>, StoreError> {
        let limit = i64::try_from(limit).map_err(|_| StoreError::InvalidInput("numeric overflow"))?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM changelog WHERE workspace=?1 ORDER BY id DESC LIMIT ?2"
        ))?;
        let rows = stmt.query_map(params![workspace.as_str(), limit], raw_entry_from_row)?;
        let entries = rows
            .map(|raw| -> Result<ChangeLogEntry, StoreError> { raw?.decode() })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn can_undo(&self, workspace: &WorkspaceId) -> Result<bool, StoreError> {
        Ok(cursor::latest_active_group(&self.conn, workspace)?.is_some())
    }

    pub fn can_redo(&self, workspace: &WorkspaceId) -> Result<bool, StoreError> {
        Ok(cursor::latest_undone_group(&self.conn, workspace)?.is_some())
    }
}
