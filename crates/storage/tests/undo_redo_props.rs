#![forbid(unsafe_code)]

use proptest::prelude::*;
use tl_core::ids::WorkspaceId;
use tl_core::model::Priority;
use tl_storage::{
    ContainerDeletePolicy, ContainerRow, CreateContainerRequest, CreateItemRequest, ItemFilter,
    ItemPatch, ItemRow, SqliteStore,
};

#[derive(Clone, Debug)]
enum Action {
    CreateContainer,
    CreateItem { container: usize },
    SetCompleted { item: usize, completed: bool },
    SetPriority { item: usize, priority: i64 },
    DeleteItem { item: usize },
    DeleteContainer { container: usize, reassign: bool },
    BulkComplete { items: Vec<usize> },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        2 => Just(Action::CreateContainer),
        3 => any::<usize>().prop_map(|container| Action::CreateItem { container }),
        2 => (any::<usize>(), any::<bool>())
            .prop_map(|(item, completed)| Action::SetCompleted { item, completed }),
        1 => (any::<usize>(), -2i64..=2)
            .prop_map(|(item, priority)| Action::SetPriority { item, priority }),
        1 => any::<usize>().prop_map(|item| Action::DeleteItem { item }),
        1 => (any::<usize>(), any::<bool>())
            .prop_map(|(container, reassign)| Action::DeleteContainer { container, reassign }),
        1 => prop::collection::vec(any::<usize>(), 1..4)
            .prop_map(|items| Action::BulkComplete { items }),
    ]
}

/// Rows with their bookkeeping timestamps blanked; replay refreshes `updated_at_ms`.
#[derive(Debug, PartialEq, Eq)]
struct Snapshot {
    containers: Vec<ContainerRow>,
    items: Vec<ItemRow>,
}

fn snapshot(store: &SqliteStore, ws: &WorkspaceId) -> Snapshot {
    let containers = store
        .list_containers(ws)
        .expect("list containers")
        .into_iter()
        .map(|row| ContainerRow {
            updated_at_ms: 0,
            ..row
        })
        .collect();
    let items = store
        .list_items(ws, &ItemFilter::default())
        .expect("list items")
        .into_iter()
        .map(|row| ItemRow {
            updated_at_ms: 0,
            ..row
        })
        .collect();
    Snapshot { containers, items }
}

fn pick<T: Copy>(values: &[T], index: usize) -> Option<T> {
    if values.is_empty() {
        None
    } else {
        Some(values[index % values.len()])
    }
}

fn apply(store: &mut SqliteStore, ws: &WorkspaceId, action: &Action) {
    let container_ids: Vec<i64> = store
        .list_containers(ws)
        .expect("list containers")
        .iter()
        .map(|row| row.id)
        .collect();
    let item_ids: Vec<i64> = store
        .list_items(ws, &ItemFilter::default())
        .expect("list items")
        .iter()
        .map(|row| row.id)
        .collect();

    match action {
        Action::CreateContainer => {
            store
                .create_container(
                    ws,
                    CreateContainerRequest {
                        name: format!("c{}", container_ids.len()),
                        position: None,
                    },
                )
                .expect("create container");
        }
        Action::CreateItem { container } => {
            if let Some(container_id) = pick(&container_ids, *container) {
                store
                    .create_item(ws, CreateItemRequest::new(container_id, "task"))
                    .expect("create item");
            }
        }
        Action::SetCompleted { item, completed } => {
            if let Some(id) = pick(&item_ids, *item) {
                store
                    .update_item(
                        ws,
                        id,
                        ItemPatch {
                            completed: Some(*completed),
                            ..ItemPatch::default()
                        },
                    )
                    .expect("update item");
            }
        }
        Action::SetPriority { item, priority } => {
            if let Some(id) = pick(&item_ids, *item) {
                store
                    .set_items_priority(ws, &[id], Priority::new(*priority))
                    .expect("set priority");
            }
        }
        Action::DeleteItem { item } => {
            if let Some(id) = pick(&item_ids, *item) {
                store.delete_item(ws, id).expect("delete item");
            }
        }
        Action::DeleteContainer {
            container,
            reassign,
        } => {
            let Some(id) = pick(&container_ids, *container) else {
                return;
            };
            let target = container_ids.iter().copied().find(|other| *other != id);
            let policy = match (reassign, target) {
                (true, Some(target)) => ContainerDeletePolicy::ReassignTo(target),
                _ => ContainerDeletePolicy::DeleteChildren,
            };
            store
                .delete_container(ws, id, policy)
                .expect("delete container");
        }
        Action::BulkComplete { items } => {
            let ids: Vec<i64> = items
                .iter()
                .filter_map(|index| pick(&item_ids, *index))
                .collect();
            store
                .set_items_completed(ws, &ids, true)
                .expect("bulk complete");
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn undo_all_restores_empty_state_and_redo_all_restores_final(
        actions in prop::collection::vec(action_strategy(), 1..24)
    ) {
        let mut store = SqliteStore::open_in_memory().expect("open store");
        let ws = WorkspaceId::try_new("ws_props").expect("workspace id");
        let initial = snapshot(&store, &ws);

        for action in &actions {
            apply(&mut store, &ws, action);
        }
        let finished = snapshot(&store, &ws);

        let mut undone = 0;
        while store.undo(&ws).expect("undo") {
            undone += 1;
        }
        prop_assert_eq!(snapshot(&store, &ws), initial);

        let mut redone = 0;
        while store.redo(&ws).expect("redo") {
            redone += 1;
        }
        prop_assert_eq!(undone, redone);
        prop_assert_eq!(snapshot(&store, &ws), finished);
    }

    #[test]
    fn partial_undo_then_redo_returns_to_final_state(
        actions in prop::collection::vec(action_strategy(), 1..24),
        steps in 0usize..8,
    ) {
        let mut store = SqliteStore::open_in_memory().expect("open store");
        let ws = WorkspaceId::try_new("ws_props").expect("workspace id");

        for action in &actions {
            apply(&mut store, &ws, action);
        }
        let finished = snapshot(&store, &ws);

        let mut undone = 0;
        while undone < steps && store.undo(&ws).expect("undo") {
            undone += 1;
        }
        for _ in 0..undone {
            prop_assert!(store.redo(&ws).expect("redo"));
        }
        prop_assert!(!store.redo(&ws).expect("redo stack drained"));
        prop_assert_eq!(snapshot(&store, &ws), finished);
    }
}
