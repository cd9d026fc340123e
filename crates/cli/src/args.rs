#![forbid(unsafe_code)]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tl_core::model::Priority;

#[derive(Parser, Debug)]
#[command(
    name = "tasklog",
    version,
    about = "Containers, items and an undoable change log",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Directory holding the store database.
    #[arg(long, global = true, env = "TASKLOG_STORAGE_DIR", default_value = "./.tasklog")]
    pub storage_dir: PathBuf,

    /// Workspace whose rows and history the command operates on.
    #[arg(long, global = true, env = "TASKLOG_WORKSPACE", default_value = "default")]
    pub workspace: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Container operations.
    #[command(subcommand)]
    Container(ContainerCommand),
    /// Item operations.
    #[command(subcommand)]
    Item(ItemCommand),
    /// Revert the most recent action.
    Undo,
    /// Re-apply the most recently undone action.
    Redo,
    /// Print the change log, newest first.
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Report whether undo and redo are available.
    Status,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ContainerCommand {
    Add {
        name: String,
        #[arg(long)]
        position: Option<i64>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        position: Option<i64>,
    },
    /// Delete a container, deleting its items unless `--reassign-to` is given.
    Remove {
        id: i64,
        #[arg(long, value_name = "CONTAINER_ID")]
        reassign_to: Option<i64>,
    },
    Get {
        id: i64,
    },
    List,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ItemCommand {
    Add {
        #[arg(long)]
        container: i64,
        body: String,
        /// `low`, `medium`, `high` or a signed integer.
        #[arg(
            long,
            default_value = "medium",
            allow_negative_numbers = true,
            value_parser = parse_priority
        )]
        priority: Priority,
        /// RFC 3339 timestamp.
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        position: Option<i64>,
    },
    Edit(ItemEditArgs),
    Remove {
        id: i64,
    },
    Get {
        id: i64,
    },
    List {
        #[arg(long)]
        container: Option<i64>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Mark items completed (or open again with `--reopen`).
    Complete {
        #[arg(required = true)]
        ids: Vec<i64>,
        #[arg(long)]
        reopen: bool,
    },
    Move {
        #[arg(long)]
        to: i64,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    Priority {
        #[arg(long, allow_negative_numbers = true, value_parser = parse_priority)]
        value: Priority,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Set or clear the due date of items.
    Due {
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        at: Option<String>,
        #[arg(long)]
        clear: bool,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct ItemEditArgs {
    pub id: i64,
    #[arg(long)]
    pub body: Option<String>,
    #[arg(long)]
    pub completed: Option<bool>,
    #[arg(long, allow_negative_numbers = true, value_parser = parse_priority)]
    pub priority: Option<Priority>,
    #[arg(long)]
    pub container: Option<i64>,
    #[arg(long)]
    pub position: Option<i64>,
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    #[arg(long)]
    pub clear_due: bool,
}

fn parse_priority(value: &str) -> Result<Priority, String> {
    match value {
        "low" => Ok(Priority::LOW),
        "medium" => Ok(Priority::MEDIUM),
        "high" => Ok(Priority::HIGH),
        other => other
            .parse::<i64>()
            .map(Priority::new)
            .map_err(|_| format!("expected low, medium, high or an integer, got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_bulk_due_clear() {
        let cli = Cli::try_parse_from([
            "tasklog",
            "--workspace",
            "home",
            "item",
            "due",
            "--clear",
            "3",
            "4",
        ])
        .expect("parse");
        assert_eq!(cli.workspace, "home");
        match cli.command {
            Command::Item(ItemCommand::Due { at, clear, ids }) => {
                assert!(at.is_none());
                assert!(clear);
                assert_eq!(ids, vec![3, 4]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn priority_accepts_names_and_numbers() {
        assert_eq!(parse_priority("low"), Ok(Priority::LOW));
        assert_eq!(parse_priority("high"), Ok(Priority::HIGH));
        assert_eq!(parse_priority("-3"), Ok(Priority::new(-3)));
        assert!(parse_priority("urgent").is_err());

        let cli = Cli::try_parse_from(["tasklog", "item", "add", "--container", "1", "milk"])
            .expect("parse");
        match cli.command {
            Command::Item(ItemCommand::Add { priority, .. }) => {
                assert_eq!(priority, Priority::MEDIUM);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn container_remove_defaults_to_deleting_children() {
        let cli = Cli::try_parse_from(["tasklog", "container", "remove", "7"]).expect("parse");
        match cli.command {
            Command::Container(ContainerCommand::Remove { id, reassign_to }) => {
                assert_eq!(id, 7);
                assert_eq!(reassign_to, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
