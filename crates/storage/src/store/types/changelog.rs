#![forbid(unsafe_code)]

use super::{ContainerPatch, ContainerRow, ItemPatch, ItemRow};
use crate::store::ReplayRejection;
use serde::{Deserialize, Serialize};
use tl_core::history::{BatchRef, Direction, OpKind};
use tl_core::model::EntityKind;

/// Payload of one primitive mutation on a row of type `R` with partial fields `P`.
///
/// Inserts and deletes carry the full row so the entry can be replayed in either direction
/// without looking at any other entry. Updates carry only the fields that changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RowChange<R, P> {
    Insert { row: R },
    Update { old: P, new: P },
    Delete { row: R },
}

impl<R, P> RowChange<R, P> {
    pub fn op(&self) -> OpKind {
        match self {
            RowChange::Insert { .. } => OpKind::Insert,
            RowChange::Update { .. } => OpKind::Update,
            RowChange::Delete { .. } => OpKind::Delete,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change {
    Container(RowChange<ContainerRow, ContainerPatch>),
    Item(RowChange<ItemRow, ItemPatch>),
}

impl Change {
    pub fn kind(&self) -> EntityKind {
        match self {
            Change::Container(_) => EntityKind::Container,
            Change::Item(_) => EntityKind::Item,
        }
    }

    pub fn op(&self) -> OpKind {
        match self {
            Change::Container(change) => change.op(),
            Change::Item(change) => change.op(),
        }
    }

    pub(crate) fn payload_json(&self) -> Result<String, serde_json::Error> {
        match self {
            Change::Container(change) => serde_json::to_string(change),
            Change::Item(change) => serde_json::to_string(change),
        }
    }

    pub(crate) fn from_payload_json(kind: EntityKind, raw: &str) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            EntityKind::Container => Change::Container(serde_json::from_str(raw)?),
            EntityKind::Item => Change::Item(serde_json::from_str(raw)?),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeLogEntry {
    pub id: i64,
    pub active: bool,
    pub batch: BatchRef,
    pub entity_id: i64,
    pub change: Change,
    pub ts_ms: i64,
}

impl ChangeLogEntry {
    pub fn op(&self) -> OpKind {
        self.change.op()
    }

    pub fn kind(&self) -> EntityKind {
        self.change.kind()
    }
}

/// Entries undone or redone together. A standalone entry forms a group of one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryGroup {
    pub batch: BatchRef,
    /// Ascending log id.
    pub entries: Vec<ChangeLogEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryOutcome {
    Applied {
        direction: Direction,
        group: HistoryGroup,
    },
    /// Nothing to undo (or redo).
    Empty,
    /// The group exists but replaying it failed; nothing was changed.
    Rejected {
        direction: Direction,
        reason: ReplayRejection,
    },
}

impl HistoryOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, HistoryOutcome::Applied { .. })
    }
}
