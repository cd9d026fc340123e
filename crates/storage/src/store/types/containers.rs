#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRow {
    pub id: i64,
    pub name: String,
    pub position: i64,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// Partial container fields. `None` means "not part of this change".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

impl ContainerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.position.is_none()
    }

    /// Splits the patch into `(old, new)` maps holding only the fields that differ from
    /// `current`. Returns `None` when nothing would change.
    pub fn diff(&self, current: &ContainerRow) -> Option<(ContainerPatch, ContainerPatch)> {
        let mut old = ContainerPatch::default();
        let mut new = ContainerPatch::default();

        if let Some(name) = self.name.as_ref().filter(|name| **name != current.name) {
            old.name = Some(current.name.clone());
            new.name = Some(name.clone());
        }
        if let Some(position) = self.position.filter(|p| *p != current.position) {
            old.position = Some(current.position);
            new.position = Some(position);
        }

        if new.is_empty() { None } else { Some((old, new)) }
    }
}

/// Result of deleting a container together with its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerDeletion {
    pub container: ContainerRow,
    /// Child items, deleted or moved depending on the policy, ascending id.
    pub item_ids: Vec<i64>,
    pub batch: tl_core::history::BatchRef,
}
