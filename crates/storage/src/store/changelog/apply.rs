#![forbid(unsafe_code)]

use super::super::{HistoryGroup, HistoryOutcome, SqliteStore, StoreError, support};
use super::cursor;
use super::replay::{ApplyError, apply_plan_tx, plan_replay};
use rusqlite::{Transaction, params};
use tl_core::history::Direction;
use tl_core::ids::WorkspaceId;

impl SqliteStore {
    /// Reverts the most recent active group. Returns false when there is nothing to undo
    /// or the group no longer applies to the current rows.
    pub fn undo(&mut self, workspace: &WorkspaceId) -> Result<bool, StoreError> {
        Ok(self.undo_detailed(workspace)?.is_applied())
    }

    /// Re-applies the most recently undone group.
    pub fn redo(&mut self, workspace: &WorkspaceId) -> Result<bool, StoreError> {
        Ok(self.redo_detailed(workspace)?.is_applied())
    }

    pub fn undo_detailed(&mut self, workspace: &WorkspaceId) -> Result<HistoryOutcome, StoreError> {
        self.replay_next_group(workspace, Direction::Undo)
    }

    pub fn redo_detailed(&mut self, workspace: &WorkspaceId) -> Result<HistoryOutcome, StoreError> {
        self.replay_next_group(workspace, Direction::Redo)
    }

    fn replay_next_group(
        &mut self,
        workspace: &WorkspaceId,
        direction: Direction,
    ) -> Result<HistoryOutcome, StoreError> {
        let now_ms = support::now_ms();
        let tx = self.begin_write(workspace, now_ms)?;

        let Some(mut group) = cursor::next_group(&tx, workspace, direction)? else {
            return Ok(HistoryOutcome::Empty);
        };

        let plan = plan_replay(&group.entries, direction);
        match apply_plan_tx(&tx, workspace, &plan, now_ms) {
            Ok(()) => {}
            Err(ApplyError::Rejected(reason)) => {
                // Dropping the transaction rolls back whatever part of the group already ran.
                drop(tx);
                tracing::warn!(
                    workspace = %workspace,
                    direction = direction.as_str(),
                    batch = ?group.batch.as_column(),
                    entries = group.entries.len(),
                    %reason,
                    "history group rejected"
                );
                return Ok(HistoryOutcome::Rejected { direction, reason });
            }
            Err(ApplyError::Store(err)) => return Err(err),
        }

        let active = direction.active_after();
        set_group_active_tx(&tx, workspace, &group, active)?;
        tx.commit()?;

        for entry in group.entries.iter_mut() {
            entry.active = active;
        }
        tracing::info!(
            workspace = %workspace,
            direction = direction.as_str(),
            batch = ?group.batch.as_column(),
            entries = group.entries.len(),
            "history group applied"
        );
        Ok(HistoryOutcome::Applied { direction, group })
    }
}

fn set_group_active_tx(
    tx: &Transaction<'_>,
    workspace: &WorkspaceId,
    group: &HistoryGroup,
    active: bool,
) -> Result<(), StoreError> {
    let mut stmt = tx.prepare("UPDATE changelog SET active=?3 WHERE workspace=?1 AND id=?2")?;
    for entry in group.entries.iter() {
        stmt.execute(params![workspace.as_str(), entry.id, i64::from(active)])?;
    }
    Ok(())
}
