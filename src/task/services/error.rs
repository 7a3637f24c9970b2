//! Service-level errors and their caller-facing classification.

use crate::task::{
    domain::{ParseMoveDirectionError, ReorderError, TaskDomainError},
    ports::TaskStoreError,
};
use std::fmt;
use thiserror::Error;

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Field validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The move direction is not recognised.
    #[error(transparent)]
    Direction(#[from] ParseMoveDirectionError),
    /// The reorder list is not a permutation of the stored tasks.
    #[error(transparent)]
    InvalidOrder(#[from] ReorderError),
    /// Store operation failed; the transaction was rolled back.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Reason classification reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// The referenced task does not exist.
    NotFound,
    /// The request is malformed or fails validation.
    InvalidInput,
    /// Another task already carries the requested name.
    Conflict,
    /// A rank uniqueness check or transaction serialisation check fired.
    ConstraintViolation,
    /// The store could not complete the request.
    StoreUnavailable,
}

impl TaskErrorKind {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidInput => "invalid_input",
            Self::Conflict => "conflict",
            Self::ConstraintViolation => "constraint_violation",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for TaskErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TaskServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::Domain(TaskDomainError::RankOverflow) => TaskErrorKind::ConstraintViolation,
            Self::Domain(_) | Self::Direction(_) | Self::InvalidOrder(_) => {
                TaskErrorKind::InvalidInput
            }
            Self::Store(TaskStoreError::NotFound(_)) => TaskErrorKind::NotFound,
            Self::Store(TaskStoreError::DuplicateName(_)) => TaskErrorKind::Conflict,
            Self::Store(TaskStoreError::RankConflict | TaskStoreError::WriteConflict) => {
                TaskErrorKind::ConstraintViolation
            }
            Self::Store(TaskStoreError::CorruptRow { .. } | TaskStoreError::Persistence(_)) => {
                TaskErrorKind::StoreUnavailable
            }
        }
    }
}
