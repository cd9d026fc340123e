#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer, Serialize};
use tl_core::model::Priority;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: i64,
    pub container_id: i64,
    pub body: String,
    pub completed: bool,
    pub priority: Priority,
    pub position: i64,
    pub due_at_ms: Option<i64>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Partial item fields. `due_at_ms` is doubly optional: `Some(None)` clears the due date.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_field"
    )]
    pub due_at_ms: Option<Option<i64>>,
}

fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.container_id.is_none()
            && self.body.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.position.is_none()
            && self.due_at_ms.is_none()
    }

    /// Same contract as [`super::ContainerPatch::diff`].
    pub fn diff(&self, current: &ItemRow) -> Option<(ItemPatch, ItemPatch)> {
        let mut old = ItemPatch::default();
        let mut new = ItemPatch::default();

        if let Some(container_id) = self.container_id.filter(|c| *c != current.container_id) {
            old.container_id = Some(current.container_id);
            new.container_id = Some(container_id);
        }
        if let Some(body) = self.body.as_ref().filter(|body| **body != current.body) {
            old.body = Some(current.body.clone());
            new.body = Some(body.clone());
        }
        if let Some(completed) = self.completed.filter(|c| *c != current.completed) {
            old.completed = Some(current.completed);
            new.completed = Some(completed);
        }
        if let Some(priority) = self.priority.filter(|p| *p != current.priority) {
            old.priority = Some(current.priority);
            new.priority = Some(priority);
        }
        if let Some(position) = self.position.filter(|p| *p != current.position) {
            old.position = Some(current.position);
            new.position = Some(position);
        }
        if let Some(due_at_ms) = self.due_at_ms.filter(|d| *d != current.due_at_ms) {
            old.due_at_ms = Some(current.due_at_ms);
            new.due_at_ms = Some(due_at_ms);
        }

        if new.is_empty() { None } else { Some((old, new)) }
    }
}

/// Select-by-predicate filter for item listings. Empty filter lists every item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub container_id: Option<i64>,
    pub completed: Option<bool>,
}

/// A single-field edit applied to many items at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulkItemEdit {
    MoveTo(i64),
    Completed(bool),
    Priority(Priority),
    Due(Option<i64>),
}

impl BulkItemEdit {
    pub fn patch(self) -> ItemPatch {
        match self {
            BulkItemEdit::MoveTo(container_id) => ItemPatch {
                container_id: Some(container_id),
                ..ItemPatch::default()
            },
            BulkItemEdit::Completed(completed) => ItemPatch {
                completed: Some(completed),
                ..ItemPatch::default()
            },
            BulkItemEdit::Priority(priority) => ItemPatch {
                priority: Some(priority),
                ..ItemPatch::default()
            },
            BulkItemEdit::Due(due_at_ms) => ItemPatch {
                due_at_ms: Some(due_at_ms),
                ..ItemPatch::default()
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulkOutcome {
    pub batch: tl_core::history::BatchRef,
    pub changed: Vec<ItemRow>,
    pub unchanged: Vec<i64>,
    pub missing: Vec<i64>,
}
