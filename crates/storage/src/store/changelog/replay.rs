#![forbid(unsafe_code)]

use super::super::support::{
    delete_container_tx, delete_item_tx, restore_container_tx, restore_item_tx,
    update_container_tx, update_item_tx,
};
use super::super::{
    Change, ChangeLogEntry, ContainerPatch, ContainerRow, ItemPatch, ItemRow, ReplayRejection,
    RowChange, StoreError, is_constraint_violation,
};
use rusqlite::Transaction;
use tl_core::history::Direction;
use tl_core::ids::WorkspaceId;
use tl_core::model::EntityKind;

/// The concrete row operation one entry turns into for a given direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum RowAction<'a> {
    RecreateContainer(&'a ContainerRow),
    RecreateItem(&'a ItemRow),
    RewriteContainer { id: i64, patch: &'a ContainerPatch },
    RewriteItem { id: i64, patch: &'a ItemPatch },
    RemoveItem(i64),
    RemoveContainer(i64),
}

impl RowAction<'_> {
    /// Containers come back before items and leave after them; field rewrites sit in
    /// between so an item can be pointed at a recreated container, or away from one that
    /// is about to go.
    fn phase(&self) -> u8 {
        match self {
            RowAction::RecreateContainer(_) => 0,
            RowAction::RecreateItem(_) => 1,
            RowAction::RewriteContainer { .. } | RowAction::RewriteItem { .. } => 2,
            RowAction::RemoveItem(_) => 3,
            RowAction::RemoveContainer(_) => 4,
        }
    }

    fn target(&self) -> (EntityKind, i64) {
        match self {
            RowAction::RecreateContainer(row) => (EntityKind::Container, row.id),
            RowAction::RecreateItem(row) => (EntityKind::Item, row.id),
            RowAction::RewriteContainer { id, .. } => (EntityKind::Container, *id),
            RowAction::RewriteItem { id, .. } => (EntityKind::Item, *id),
            RowAction::RemoveItem(id) => (EntityKind::Item, *id),
            RowAction::RemoveContainer(id) => (EntityKind::Container, *id),
        }
    }
}

fn row_action(entry: &ChangeLogEntry, direction: Direction) -> RowAction<'_> {
    let id = entry.entity_id;
    match (&entry.change, direction) {
        (Change::Container(RowChange::Insert { .. }), Direction::Undo)
        | (Change::Container(RowChange::Delete { .. }), Direction::Redo) => {
            RowAction::RemoveContainer(id)
        }
        (Change::Container(RowChange::Insert { row }), Direction::Redo)
        | (Change::Container(RowChange::Delete { row }), Direction::Undo) => {
            RowAction::RecreateContainer(row)
        }
        (Change::Container(RowChange::Update { old, .. }), Direction::Undo) => {
            RowAction::RewriteContainer { id, patch: old }
        }
        (Change::Container(RowChange::Update { new, .. }), Direction::Redo) => {
            RowAction::RewriteContainer { id, patch: new }
        }
        (Change::Item(RowChange::Insert { .. }), Direction::Undo)
        | (Change::Item(RowChange::Delete { .. }), Direction::Redo) => RowAction::RemoveItem(id),
        (Change::Item(RowChange::Insert { row }), Direction::Redo)
        | (Change::Item(RowChange::Delete { row }), Direction::Undo) => {
            RowAction::RecreateItem(row)
        }
        (Change::Item(RowChange::Update { old, .. }), Direction::Undo) => {
            RowAction::RewriteItem { id, patch: old }
        }
        (Change::Item(RowChange::Update { new, .. }), Direction::Redo) => {
            RowAction::RewriteItem { id, patch: new }
        }
    }
}

/// Orders a group's row actions so the container/item reference holds after every step.
///
/// Undo walks entries newest first and redo oldest first; the sort by phase is stable, so
/// that walk order is kept within each phase.
pub(super) fn plan_replay(entries: &[ChangeLogEntry], direction: Direction) -> Vec<RowAction<'_>> {
    let mut ordered: Vec<&ChangeLogEntry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.id);
    if direction == Direction::Undo {
        ordered.reverse();
    }

    let mut plan: Vec<RowAction<'_>> = ordered
        .into_iter()
        .map(|entry| row_action(entry, direction))
        .collect();
    plan.sort_by_key(|action| action.phase());
    plan
}

pub(super) enum ApplyError {
    Rejected(ReplayRejection),
    Store(StoreError),
}

impl From<StoreError> for ApplyError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

pub(super) fn apply_plan_tx(
    tx: &Transaction<'_>,
    workspace: &WorkspaceId,
    plan: &[RowAction<'_>],
    now_ms: i64,
) -> Result<(), ApplyError> {
    for action in plan {
        apply_row_action_tx(tx, workspace, action, now_ms)?;
    }
    Ok(())
}

fn apply_row_action_tx(
    tx: &Transaction<'_>,
    workspace: &WorkspaceId,
    action: &RowAction<'_>,
    now_ms: i64,
) -> Result<(), ApplyError> {
    let ws = workspace.as_str();
    let (kind, id) = action.target();
    let outcome = match *action {
        RowAction::RecreateContainer(row) => {
            restore_container_tx(tx, ws, row, now_ms).map(|()| true)
        }
        RowAction::RecreateItem(row) => restore_item_tx(tx, ws, row, now_ms).map(|()| true),
        RowAction::RewriteContainer { id, patch } => {
            update_container_tx(tx, ws, id, patch, now_ms)
        }
        RowAction::RewriteItem { id, patch } => update_item_tx(tx, ws, id, patch, now_ms),
        RowAction::RemoveItem(id) => delete_item_tx(tx, ws, id),
        RowAction::RemoveContainer(id) => delete_container_tx(tx, ws, id),
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => Err(ApplyError::Rejected(ReplayRejection::Missing { kind, id })),
        Err(StoreError::Sql(err)) if is_constraint_violation(&err) => {
            Err(ApplyError::Rejected(ReplayRejection::Conflict { kind, id }))
        }
        Err(err) => Err(ApplyError::Store(err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_core::history::{BatchId, BatchRef};
    use tl_core::model::Priority;

    fn container(id: i64) -> ContainerRow {
        ContainerRow {
            id,
            name: format!("c{id}"),
            position: id,
            created_at_ms: 1,
            updated_at_ms: 1,
        }
    }

    fn item(id: i64, container_id: i64) -> ItemRow {
        ItemRow {
            id,
            container_id,
            body: format!("i{id}"),
            completed: false,
            priority: Priority::MEDIUM,
            position: id,
            due_at_ms: None,
            created_at_ms: 1,
            updated_at_ms: 1,
        }
    }

    fn entry(id: i64, entity_id: i64, change: Change, batch: &BatchRef) -> ChangeLogEntry {
        ChangeLogEntry {
            id,
            active: true,
            batch: batch.clone(),
            entity_id,
            change,
            ts_ms: 1,
        }
    }

    fn cascade_delete_group() -> Vec<ChangeLogEntry> {
        let batch = BatchRef::Batch(BatchId::generate());
        vec![
            entry(10, 1, Change::Item(RowChange::Delete { row: item(1, 7) }), &batch),
            entry(11, 2, Change::Item(RowChange::Delete { row: item(2, 7) }), &batch),
            entry(
                12,
                7,
                Change::Container(RowChange::Delete { row: container(7) }),
                &batch,
            ),
        ]
    }

    #[test]
    fn undo_of_cascade_delete_recreates_container_first() {
        let group = cascade_delete_group();
        let plan = plan_replay(&group, Direction::Undo);
        let targets: Vec<_> = plan.iter().map(|action| action.target()).collect();
        assert_eq!(
            targets,
            vec![
                (EntityKind::Container, 7),
                (EntityKind::Item, 2),
                (EntityKind::Item, 1),
            ]
        );
        assert!(matches!(plan[0], RowAction::RecreateContainer(_)));
    }

    #[test]
    fn redo_of_cascade_delete_removes_items_first() {
        let group = cascade_delete_group();
        let plan = plan_replay(&group, Direction::Redo);
        assert_eq!(
            plan,
            vec![
                RowAction::RemoveItem(1),
                RowAction::RemoveItem(2),
                RowAction::RemoveContainer(7),
            ]
        );
    }

    #[test]
    fn undo_of_reassign_restores_container_before_moving_items_back() {
        let batch = BatchRef::Batch(BatchId::generate());
        let old = ItemPatch {
            container_id: Some(7),
            ..ItemPatch::default()
        };
        let new = ItemPatch {
            container_id: Some(8),
            ..ItemPatch::default()
        };
        let group = vec![
            entry(
                20,
                3,
                Change::Item(RowChange::Update {
                    old: old.clone(),
                    new: new.clone(),
                }),
                &batch,
            ),
            entry(
                21,
                7,
                Change::Container(RowChange::Delete { row: container(7) }),
                &batch,
            ),
        ];

        let undo = plan_replay(&group, Direction::Undo);
        assert!(matches!(undo[0], RowAction::RecreateContainer(row) if row.id == 7));
        assert_eq!(undo[1], RowAction::RewriteItem { id: 3, patch: &old });

        let redo = plan_replay(&group, Direction::Redo);
        assert_eq!(redo[0], RowAction::RewriteItem { id: 3, patch: &new });
        assert_eq!(redo[1], RowAction::RemoveContainer(7));
    }

    #[test]
    fn mixed_group_orders_by_action_not_by_batch_shape() {
        let batch = BatchRef::Batch(BatchId::generate());
        let group = vec![
            entry(
                30,
                9,
                Change::Container(RowChange::Insert { row: container(9) }),
                &batch,
            ),
            entry(31, 5, Change::Item(RowChange::Insert { row: item(5, 9) }), &batch),
            entry(32, 4, Change::Item(RowChange::Delete { row: item(4, 2) }), &batch),
        ];

        let undo = plan_replay(&group, Direction::Undo);
        assert_eq!(undo[0].target(), (EntityKind::Item, 4));
        assert!(matches!(undo[0], RowAction::RecreateItem(_)));
        assert_eq!(undo[1], RowAction::RemoveItem(5));
        assert_eq!(undo[2], RowAction::RemoveContainer(9));

        let redo = plan_replay(&group, Direction::Redo);
        assert!(matches!(redo[0], RowAction::RecreateContainer(row) if row.id == 9));
        assert!(matches!(redo[1], RowAction::RecreateItem(row) if row.id == 5));
        assert_eq!(redo[2], RowAction::RemoveItem(4));
    }

    #[test]
    fn repeated_updates_replay_in_walk_order() {
        let first = (
            ItemPatch {
                priority: Some(Priority::new(0)),
                ..ItemPatch::default()
            },
            ItemPatch {
                priority: Some(Priority::new(1)),
                ..ItemPatch::default()
            },
        );
        let second = (
            ItemPatch {
                priority: Some(Priority::new(1)),
                ..ItemPatch::default()
            },
            ItemPatch {
                priority: Some(Priority::new(2)),
                ..ItemPatch::default()
            },
        );
        let batch = BatchRef::Batch(BatchId::generate());
        let group = vec![
            entry(
                41,
                1,
                Change::Item(RowChange::Update {
                    old: second.0.clone(),
                    new: second.1.clone(),
                }),
                &batch,
            ),
            entry(
                40,
                1,
                Change::Item(RowChange::Update {
                    old: first.0.clone(),
                    new: first.1.clone(),
                }),
                &batch,
            ),
        ];

        let undo = plan_replay(&group, Direction::Undo);
        assert_eq!(
            undo,
            vec![
                RowAction::RewriteItem { id: 1, patch: &second.0 },
                RowAction::RewriteItem { id: 1, patch: &first.0 },
            ]
        );
        let redo = plan_replay(&group, Direction::Redo);
        assert_eq!(
            redo,
            vec![
                RowAction::RewriteItem { id: 1, patch: &first.1 },
                RowAction::RewriteItem { id: 1, patch: &second.1 },
            ]
        );
    }
}
