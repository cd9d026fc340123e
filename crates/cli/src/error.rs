#![forbid(unsafe_code)]

use tl_core::ids::WorkspaceIdError;
use tl_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("workspace: {0}")]
    Workspace(#[from] WorkspaceIdError),
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTime { value: String, reason: String },
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },
    #[error("nothing to change: pass at least one field")]
    EmptyEdit,
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
