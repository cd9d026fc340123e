#![forbid(unsafe_code)]

use tl_core::model::Priority;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateContainerRequest {
    pub name: String,
    /// Defaults to one past the current maximum in the workspace.
    pub position: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateItemRequest {
    pub container_id: i64,
    pub body: String,
    pub priority: Priority,
    pub due_at_ms: Option<i64>,
    /// Defaults to one past the current maximum within the container.
    pub position: Option<i64>,
}

impl CreateItemRequest {
    pub fn new(container_id: i64, body: impl Into<String>) -> Self {
        Self {
            container_id,
            body: body.into(),
            priority: Priority::MEDIUM,
            due_at_ms: None,
            position: None,
        }
    }
}

/// What happens to a container's items when the container is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerDeletePolicy {
    ReassignTo(i64),
    DeleteChildren,
}
