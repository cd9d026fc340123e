#![forbid(unsafe_code)]

pub mod history;

pub mod ids {
    use std::fmt;

    #[derive(Clone, Debug, PartialEq, Eq, Hash)]
    pub struct WorkspaceId(String);

    impl WorkspaceId {
        pub fn as_str(&self) -> &str {
            &self.0
        }

        pub fn try_new(value: impl Into<String>) -> Result<Self, WorkspaceIdError> {
            let value = value.into();
            validate_workspace_id(&value)?;
            Ok(Self(value))
        }
    }

    impl fmt::Display for WorkspaceId {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum WorkspaceIdError {
        Empty,
        TooLong,
        InvalidFirstChar,
        InvalidChar { ch: char, index: usize },
    }

    impl fmt::Display for WorkspaceIdError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Self::Empty => f.write_str("workspace id must not be empty"),
                Self::TooLong => f.write_str("workspace id is too long"),
                Self::InvalidFirstChar => {
                    f.write_str("workspace id must start with an ascii letter or digit")
                }
                Self::InvalidChar { ch, index } => {
                    write!(f, "workspace id has invalid char {ch:?} at {index}")
                }
            }
        }
    }

    impl std::error::Error for WorkspaceIdError {}

    const MAX_WORKSPACE_ID_LEN: usize = 128;

    /// Ascii alphanumeric lead, then alphanumerics or `.` `_` `/` `-`.
    fn validate_workspace_id(value: &str) -> Result<(), WorkspaceIdError> {
        if value.is_empty() {
            return Err(WorkspaceIdError::Empty);
        }
        if value.len() > MAX_WORKSPACE_ID_LEN {
            return Err(WorkspaceIdError::TooLong);
        }
        match value.chars().enumerate().find(|(index, ch)| !workspace_char_allowed(*index, *ch)) {
            None => Ok(()),
            Some((0, _)) => Err(WorkspaceIdError::InvalidFirstChar),
            Some((index, ch)) => Err(WorkspaceIdError::InvalidChar { ch, index }),
        }
    }

    fn workspace_char_allowed(index: usize, ch: char) -> bool {
        ch.is_ascii_alphanumeric() || (index > 0 && matches!(ch, '.' | '_' | '/' | '-'))
    }

}

pub mod model {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// The two row kinds the change log knows about. Items reference containers.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum EntityKind {
        Container,
        Item,
    }

    impl EntityKind {
        pub fn as_str(self) -> &'static str {
            match self {
                EntityKind::Container => "container",
                EntityKind::Item => "item",
            }
        }

        pub fn parse(value: &str) -> Option<Self> {
            match value {
                "container" => Some(EntityKind::Container),
                "item" => Some(EntityKind::Item),
                _ => None,
            }
        }
    }

    impl fmt::Display for EntityKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.as_str())
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum PriorityLevel {
        Low,
        Medium,
        High,
    }

    impl PriorityLevel {
        pub fn as_str(self) -> &'static str {
            match self {
                PriorityLevel::Low => "low",
                PriorityLevel::Medium => "medium",
                PriorityLevel::High => "high",
            }
        }
    }

    /// Signed item priority. Only the sign is meaningful for display.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Priority(i64);

    impl Priority {
        pub const LOW: Priority = Priority(-1);
        pub const MEDIUM: Priority = Priority(0);
        pub const HIGH: Priority = Priority(1);

        pub fn new(value: i64) -> Self {
            Self(value)
        }

        pub fn value(self) -> i64 {
            self.0
        }

        pub fn level(self) -> PriorityLevel {
            match self.0 {
                v if v < 0 => PriorityLevel::Low,
                0 => PriorityLevel::Medium,
                _ => PriorityLevel::High,
            }
        }
    }

}
