#![forbid(unsafe_code)]

use tl_core::model::EntityKind;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    #[error("unknown container (id={0})")]
    UnknownContainer(i64),
    #[error("payload json: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("corrupt change log entry (id={entry_id}): {reason}")]
    CorruptEntry { entry_id: i64, reason: String },
}

/// Why a history group could not be replayed. Never surfaced as an error: the group is
/// left untouched and the caller sees a rejected outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReplayRejection {
    /// A row the entry targets is gone (or was never recreated).
    Missing { kind: EntityKind, id: i64 },
    /// Applying the entry would break the container/item reference or reuse a live id.
    Conflict { kind: EntityKind, id: i64 },
}

impl std::fmt::Display for ReplayRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing { kind, id } => write!(f, "{kind} {id} not found"),
            Self::Conflict { kind, id } => write!(f, "{kind} {id} conflicts with current rows"),
        }
    }
}
