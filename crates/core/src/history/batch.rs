#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier shared by every entry of one multi-row action.
///
/// Generated as a UUIDv7: a millisecond timestamp prefix followed by random bits, so two
/// batches never collide within the lifetime of a log and ids sort roughly by creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    pub fn generate() -> Self {
        Self(Uuid::now_v7().hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn try_new(value: impl Into<String>) -> Result<Self, BatchIdError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BatchIdError::Empty);
        }
        if trimmed.len() > 64 {
            return Err(BatchIdError::TooLong);
        }
        if trimmed.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(BatchIdError::InvalidChar);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchIdError {
    Empty,
    TooLong,
    InvalidChar,
}

impl BatchIdError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "batch id must not be empty",
            Self::TooLong => "batch id is too long",
            Self::InvalidChar => "batch id contains whitespace or control characters",
        }
    }
}

/// Batch membership of a change log entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum BatchRef {
    #[default]
    None,
    Batch(BatchId),
}

impl BatchRef {
    pub fn batch_id(&self) -> Option<&BatchId> {
        match self {
            BatchRef::None => None,
            BatchRef::Batch(id) => Some(id),
        }
    }

    pub fn is_batch(&self) -> bool {
        matches!(self, BatchRef::Batch(_))
    }

    /// Column value: `NULL` for standalone entries.
    pub fn as_column(&self) -> Option<&str> {
        self.batch_id().map(BatchId::as_str)
    }

    pub fn from_column(value: Option<String>) -> Result<Self, BatchIdError> {
        match value {
            None => Ok(BatchRef::None),
            Some(raw) => BatchId::try_new(raw).map(BatchRef::Batch),
        }
    }
}
