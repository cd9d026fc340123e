#![forbid(unsafe_code)]

use crate::args::{Command, ContainerCommand, ItemCommand, ItemEditArgs};
use crate::error::CliError;
use crate::render;
use crate::time_fmt::parse_rfc3339_ms;
use serde_json::Value;
use tl_core::ids::WorkspaceId;
use tl_storage::{
    ContainerDeletePolicy, ContainerPatch, CreateContainerRequest, CreateItemRequest, ItemFilter,
    ItemPatch, SqliteStore,
};

/// Runs one command and returns the JSON lines to print.
pub(crate) fn dispatch(
    store: &mut SqliteStore,
    workspace: &WorkspaceId,
    command: Command,
) -> Result<Vec<Value>, CliError> {
    match command {
        Command::Container(command) => container(store, workspace, command),
        Command::Item(command) => item(store, workspace, command),
        Command::Undo => Ok(vec![render::history_outcome(
            &store.undo_detailed(workspace)?,
        )]),
        Command::Redo => Ok(vec![render::history_outcome(
            &store.redo_detailed(workspace)?,
        )]),
        Command::History { limit } => store
            .history(workspace, limit)?
            .iter()
            .map(|entry| render::entry(entry).map_err(CliError::from))
            .collect(),
        Command::Status => Ok(vec![render::status(
            store.can_undo(workspace)?,
            store.can_redo(workspace)?,
        )]),
    }
}

fn container(
    store: &mut SqliteStore,
    workspace: &WorkspaceId,
    command: ContainerCommand,
) -> Result<Vec<Value>, CliError> {
    match command {
        ContainerCommand::Add { name, position } => {
            let row = store.create_container(workspace, CreateContainerRequest { name, position })?;
            Ok(vec![render::container(&row)])
        }
        ContainerCommand::Edit { id, name, position } => {
            let patch = ContainerPatch { name, position };
            if patch.is_empty() {
                return Err(CliError::EmptyEdit);
            }
            let row = store
                .update_container(workspace, id, patch)?
                .ok_or(CliError::NotFound {
                    kind: "container",
                    id,
                })?;
            Ok(vec![render::container(&row)])
        }
        ContainerCommand::Remove { id, reassign_to } => {
            let policy = match reassign_to {
                Some(target) => ContainerDeletePolicy::ReassignTo(target),
                None => ContainerDeletePolicy::DeleteChildren,
            };
            let deleted = store
                .delete_container(workspace, id, policy)?
                .ok_or(CliError::NotFound {
                    kind: "container",
                    id,
                })?;
            Ok(vec![render::deletion(&deleted)])
        }
        ContainerCommand::Get { id } => {
            let row = store
                .get_container(workspace, id)?
                .ok_or(CliError::NotFound {
                    kind: "container",
                    id,
                })?;
            Ok(vec![render::container(&row)])
        }
        ContainerCommand::List => Ok(store
            .list_containers(workspace)?
            .iter()
            .map(render::container)
            .collect()),
    }
}

fn item(
    store: &mut SqliteStore,
    workspace: &WorkspaceId,
    command: ItemCommand,
) -> Result<Vec<Value>, CliError> {
    match command {
        ItemCommand::Add {
            container,
            body,
            priority,
            due,
            position,
        } => {
            let request = CreateItemRequest {
                container_id: container,
                body,
                priority,
                due_at_ms: due.as_deref().map(parse_rfc3339_ms).transpose()?,
                position,
            };
            let row = store.create_item(workspace, request)?;
            Ok(vec![render::item(&row)])
        }
        ItemCommand::Edit(args) => {
            let id = args.id;
            let patch = item_patch(args)?;
            if patch.is_empty() {
                return Err(CliError::EmptyEdit);
            }
            let row = store
                .update_item(workspace, id, patch)?
                .ok_or(CliError::NotFound { kind: "item", id })?;
            Ok(vec![render::item(&row)])
        }
        ItemCommand::Remove { id } => {
            let deleted = store.delete_item(workspace, id)?;
            Ok(vec![render::item_deleted(id, deleted)])
        }
        ItemCommand::Get { id } => {
            let row = store
                .get_item(workspace, id)?
                .ok_or(CliError::NotFound { kind: "item", id })?;
            Ok(vec![render::item(&row)])
        }
        ItemCommand::List {
            container,
            completed,
        } => {
            let filter = ItemFilter {
                container_id: container,
                completed,
            };
            Ok(store
                .list_items(workspace, &filter)?
                .iter()
                .map(render::item)
                .collect())
        }
        ItemCommand::Complete { ids, reopen } => {
            let outcome = store.set_items_completed(workspace, &ids, !reopen)?;
            Ok(vec![render::bulk(&outcome)])
        }
        ItemCommand::Move { to, ids } => {
            let outcome = store.move_items(workspace, &ids, to)?;
            Ok(vec![render::bulk(&outcome)])
        }
        ItemCommand::Priority { value, ids } => {
            let outcome = store.set_items_priority(workspace, &ids, value)?;
            Ok(vec![render::bulk(&outcome)])
        }
        ItemCommand::Due { at, clear: _, ids } => {
            let due_at_ms = at.as_deref().map(parse_rfc3339_ms).transpose()?;
            let outcome = store.set_items_due(workspace, &ids, due_at_ms)?;
            Ok(vec![render::bulk(&outcome)])
        }
    }
}

fn item_patch(args: ItemEditArgs) -> Result<ItemPatch, CliError> {
    let due_at_ms = if args.clear_due {
        Some(None)
    } else {
        args.due
            .as_deref()
            .map(parse_rfc3339_ms)
            .transpose()?
            .map(Some)
    };
    Ok(ItemPatch {
        container_id: args.container,
        body: args.body,
        completed: args.completed,
        priority: args.priority,
        position: args.position,
        due_at_ms,
    })
}
