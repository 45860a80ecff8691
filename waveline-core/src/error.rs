//! Editor errors and user-facing notices

use sync_backend::{EntityKind, Rejection};
use uuid::Uuid;

/// Errors raised by the editing engine
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    /// The store refused a mutation
    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// A caller broke an engine invariant (e.g. a reorder list missing an id)
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("{0} {1} not found")]
    NotFound(EntityKind, Uuid),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("no project is open")]
    NoProject,
}

impl EditorError {
    /// Whether the failure was caused by a collaborator's concurrent edit
    pub fn is_conflict(&self) -> bool {
        match self {
            EditorError::Rejected(rejection) => rejection.is_conflict(),
            _ => false,
        }
    }
}

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

/// A transient message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
