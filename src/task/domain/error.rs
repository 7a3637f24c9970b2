//! Error types for task domain validation and parsing.

use super::TaskId;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The task name exceeds the persisted column width.
    #[error("task name has {actual} characters, exceeds limit of {max}")]
    TaskNameTooLong {
        /// Maximum permitted number of characters.
        max: usize,
        /// Number of characters supplied.
        actual: usize,
    },

    /// The cost is not a non-negative decimal with at most two fractional
    /// digits.
    #[error("invalid cost '{0}', expected a non-negative amount such as 12.50")]
    InvalidCost(String),

    /// A cost value or cost total does not fit the persisted range.
    #[error("cost exceeds the supported range")]
    CostOverflow,

    /// The due date is not a calendar date in `YYYY-MM-DD` format.
    #[error("invalid due date '{0}', expected YYYY-MM-DD")]
    InvalidDueDate(String),

    /// The due date lies before the current local date.
    #[error("due date {due_date} is earlier than today ({today})")]
    DueDateInPast {
        /// The rejected due date.
        due_date: NaiveDate,
        /// The local date at validation time.
        today: NaiveDate,
    },

    /// The task identifier is not a positive integer.
    #[error("invalid task identifier {0}, expected a positive integer")]
    InvalidTaskId(i64),

    /// The task identifier text could not be parsed.
    #[error("malformed task identifier '{0}'")]
    MalformedTaskId(String),

    /// A final rank must be a positive integer.
    #[error("invalid rank {0}, expected a positive integer")]
    InvalidRank(i64),

    /// A temporary rank must be a negative integer.
    #[error("invalid temporary rank {0}, expected a negative integer")]
    InvalidTemporaryRank(i64),

    /// No rank is left above the current maximum.
    #[error("rank sequence exhausted")]
    RankOverflow,
}

/// Error returned while parsing a move direction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown move direction '{0}', expected 'up' or 'down'")]
pub struct ParseMoveDirectionError(pub String);

/// Errors returned while validating a full reorder request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReorderError {
    /// The order list is empty.
    #[error("reorder list must not be empty")]
    EmptyOrder,

    /// An entry is not a well-formed task identifier.
    #[error("malformed task identifier {0} in reorder list")]
    MalformedId(i64),

    /// The order list does not name every stored task exactly once.
    #[error("reorder list names {actual} tasks, but {expected} tasks are stored")]
    CountMismatch {
        /// Number of stored tasks.
        expected: u64,
        /// Number of identifiers supplied.
        actual: usize,
    },

    /// An identifier appears more than once.
    #[error("task {0} appears more than once in reorder list")]
    DuplicateId(TaskId),

    /// An identifier does not refer to a stored task.
    #[error("task {0} in reorder list does not exist")]
    UnknownId(TaskId),
}
