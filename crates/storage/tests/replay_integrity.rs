#![forbid(unsafe_code)]

use assert_matches::assert_matches;
use rusqlite::{Connection, params};
use tl_core::history::Direction;
use tl_core::ids::WorkspaceId;
use tl_core::model::EntityKind;
use tl_storage::{
    ContainerDeletePolicy, CreateContainerRequest, CreateItemRequest, HistoryOutcome, ItemPatch,
    ReplayRejection, SqliteStore, StoreError,
};

const DB_FILE_NAME: &str = "tasklog.db";

fn workspace() -> WorkspaceId {
    WorkspaceId::try_new("ws_integrity").expect("workspace id")
}

fn raw_connection(dir: &tempfile::TempDir) -> Connection {
    Connection::open(dir.path().join(DB_FILE_NAME)).expect("open raw connection")
}

fn active_flags(dir: &tempfile::TempDir) -> Vec<(i64, bool)> {
    let conn = raw_connection(dir);
    let mut stmt = conn
        .prepare("SELECT id, active FROM changelog ORDER BY id ASC")
        .expect("prepare");
    stmt.query_map([], |row| Ok((row.get(0)?, row.get::<_, i64>(1)? != 0)))
        .expect("query")
        .collect::<Result<Vec<_>, _>>()
        .expect("collect")
}

#[test]
fn undo_of_update_is_rejected_when_row_was_removed_outside_the_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ws = workspace();
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    let list = store
        .create_container(
            &ws,
            CreateContainerRequest {
                name: "List".to_string(),
                position: None,
            },
        )
        .expect("create");
    let item = store
        .create_item(&ws, CreateItemRequest::new(list.id, "draft"))
        .expect("create item");
    store
        .update_item(
            &ws,
            item.id,
            ItemPatch {
                completed: Some(true),
                ..ItemPatch::default()
            },
        )
        .expect("update")
        .expect("item");

    raw_connection(&dir)
        .execute("DELETE FROM items WHERE id=?1", params![item.id])
        .expect("delete behind the store's back");
    let before = active_flags(&dir);

    let outcome = store.undo_detailed(&ws).expect("undo");
    assert_matches!(
        outcome,
        HistoryOutcome::Rejected {
            direction: Direction::Undo,
            reason: ReplayRejection::Missing { kind: EntityKind::Item, id },
        } if id == item.id
    );
    assert_eq!(active_flags(&dir), before);
    assert!(!store.undo(&ws).expect("still rejected"));
}

#[test]
fn rejected_batch_leaves_no_partial_changes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ws = workspace();
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    let list = store
        .create_container(
            &ws,
            CreateContainerRequest {
                name: "Errands".to_string(),
                position: None,
            },
        )
        .expect("create");
    let first = store
        .create_item(&ws, CreateItemRequest::new(list.id, "bank"))
        .expect("create item");
    let second = store
        .create_item(&ws, CreateItemRequest::new(list.id, "post office"))
        .expect("create item");
    store
        .set_items_completed(&ws, &[first.id, second.id], true)
        .expect("bulk complete");

    // The second item of the batch disappears; its sibling must not be reverted alone.
    raw_connection(&dir)
        .execute("DELETE FROM items WHERE id=?1", params![second.id])
        .expect("delete behind the store's back");

    assert!(!store.undo(&ws).expect("undo"));
    let first_now = store.get_item(&ws, first.id).expect("get").expect("item");
    assert!(first_now.completed);
}

#[test]
fn undo_of_container_delete_conflicts_with_reused_row() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ws = workspace();
    let mut store = SqliteStore::open(dir.path()).expect("open store");

    let list = store
        .create_container(
            &ws,
            CreateContainerRequest {
                name: "Gone".to_string(),
                position: None,
            },
        )
        .expect("create");
    store
        .delete_container(&ws, list.id, ContainerDeletePolicy::DeleteChildren)
        .expect("delete")
        .expect("container");

    raw_connection(&dir)
        .execute(
            "INSERT INTO containers(id, workspace, name, position, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, 'squatter', 1, 0, 0)",
            params![list.id, ws.as_str()],
        )
        .expect("insert behind the store's back");

    let outcome = store.undo_detailed(&ws).expect("undo");
    assert_matches!(
        outcome,
        HistoryOutcome::Rejected {
            reason: ReplayRejection::Conflict { kind: EntityKind::Container, .. },
            ..
        }
    );
    let container = store.get_container(&ws, list.id).expect("get").expect("row");
    assert_eq!(container.name, "squatter");
}

#[test]
fn reopened_store_keeps_log_and_active_flags() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ws = workspace();
    let item_id;
    {
        let mut store = SqliteStore::open(dir.path()).expect("open store");
        let list = store
            .create_container(
                &ws,
                CreateContainerRequest {
                    name: "Persisted".to_string(),
                    position: None,
                },
            )
            .expect("create");
        item_id = store
            .create_item(&ws, CreateItemRequest::new(list.id, "survive restart"))
            .expect("create item")
            .id;
        assert!(store.undo(&ws).expect("undo"));
    }

    let mut store = SqliteStore::open(dir.path()).expect("reopen store");
    assert_eq!(store.storage_dir(), Some(dir.path()));
    let history = store.history(&ws, 10).expect("history");
    assert_eq!(history.len(), 2);
    assert!(!history[0].active);
    assert!(history[1].active);

    assert!(store.redo(&ws).expect("redo after reopen"));
    let item = store.get_item(&ws, item_id).expect("get").expect("item");
    assert_eq!(item.id, item_id);
    assert_eq!(item.body, "survive restart");
}

#[test]
fn ids_are_not_reused_after_undo() {
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let ws = workspace();
    let first = store
        .create_container(
            &ws,
            CreateContainerRequest {
                name: "One".to_string(),
                position: None,
            },
        )
        .expect("create");
    assert!(store.undo(&ws).expect("undo"));

    let second = store
        .create_container(
            &ws,
            CreateContainerRequest {
                name: "Two".to_string(),
                position: None,
            },
        )
        .expect("create");
    assert!(second.id > first.id);
}

#[test]
fn open_refuses_foreign_schema() {
    let dir = tempfile::tempdir().expect("temp dir");
    {
        let conn = raw_connection(&dir);
        conn.execute_batch("CREATE TABLE todos(id INTEGER PRIMARY KEY, text TEXT);")
            .expect("create foreign table");
    }

    let err = SqliteStore::open(dir.path()).expect_err("foreign schema");
    assert_matches!(err, StoreError::InvalidInput(message) if message.starts_with("RESET_REQUIRED"));
}

#[test]
fn open_refuses_schema_version_mismatch() {
    let dir = tempfile::tempdir().expect("temp dir");
    drop(SqliteStore::open(dir.path()).expect("open store"));
    raw_connection(&dir)
        .execute("UPDATE store_state SET schema_version=99 WHERE singleton=1", [])
        .expect("bump version");

    let err = SqliteStore::open(dir.path()).expect_err("version mismatch");
    assert_matches!(
        err,
        StoreError::InvalidInput("RESET_REQUIRED: schema version mismatch")
    );
}

#[test]
fn open_refuses_store_with_missing_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    drop(SqliteStore::open(dir.path()).expect("open store"));
    raw_connection(&dir)
        .execute_batch("DROP TABLE changelog;")
        .expect("drop table");

    let err = SqliteStore::open(dir.path()).expect_err("missing table");
    assert_matches!(
        err,
        StoreError::InvalidInput("RESET_REQUIRED: required table is missing")
    );
}

#[test]
fn corrupt_payload_surfaces_as_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let ws = workspace();
    let mut store = SqliteStore::open(dir.path()).expect("open store");
    store
        .create_container(
            &ws,
            CreateContainerRequest {
                name: "Broken".to_string(),
                position: None,
            },
        )
        .expect("create");

    raw_connection(&dir)
        .execute("UPDATE changelog SET payload_json='{\"op\":\"bogus\"}'", [])
        .expect("corrupt payload");

    let err = store.undo(&ws).expect_err("corrupt entry");
    assert_matches!(err, StoreError::CorruptEntry { .. });
}
