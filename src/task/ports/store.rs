//! Store port for task persistence and atomic rank mutation.
//!
//! Every rank mutation is expressed as work against one open
//! [`TaskTransaction`]. [`TaskStore::run_atomic`] commits the work only when it
//! returns `Ok`; any error rolls every write of the transaction back before it
//! is returned to the caller.

use crate::task::domain::{
    Rank, RankAssignment, RankBound, RankedTask, Task, TaskDetails, TaskId, TaskName,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Implementations must enforce rank uniqueness and name uniqueness on every
/// write, including writes inside an uncommitted transaction.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Runs `work` inside one all-or-nothing transaction.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `work`, or a [`TaskStoreError`]
    /// converted into `E` when the transaction cannot be opened or
    /// committed. No write of a failed transaction is visible afterwards.
    async fn run_atomic<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static;

    /// Finds a committed task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns all committed tasks in ascending rank order.
    async fn list(&self) -> TaskStoreResult<Vec<Task>>;
}

/// Operations available inside an open store transaction.
///
/// Writes return the number of affected rows so callers can tell a missing
/// task apart from a successful write.
pub trait TaskTransaction {
    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the lookup fails.
    fn find_by_id(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Finds the task nearest to the pivot of `bound` on its side.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the lookup fails.
    fn find_by_rank(&mut self, bound: RankBound) -> TaskStoreResult<Option<RankedTask>>;

    /// Counts stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the lookup fails.
    fn count(&mut self) -> TaskStoreResult<u64>;

    /// Returns the greatest stored rank, or `None` when no task is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the lookup fails.
    fn max_rank(&mut self) -> TaskStoreResult<Option<Rank>>;

    /// Inserts a task at `rank` and returns its store-assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateName`] or
    /// [`TaskStoreError::RankConflict`] when a uniqueness constraint fires.
    fn insert(&mut self, details: &TaskDetails, rank: Rank) -> TaskStoreResult<TaskId>;

    /// Replaces the descriptive fields of a task, leaving its rank alone.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateName`] when another task carries
    /// the new name.
    fn update_details(&mut self, id: TaskId, details: &TaskDetails) -> TaskStoreResult<u64>;

    /// Writes a task's rank column.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::RankConflict`] when another task already
    /// holds the value.
    fn update_rank(&mut self, id: TaskId, assignment: RankAssignment) -> TaskStoreResult<u64>;

    /// Removes a task without renumbering the others.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError`] when the delete fails.
    fn delete(&mut self, id: TaskId) -> TaskStoreResult<u64>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Another task already carries the name.
    #[error("a task named '{0}' already exists")]
    DuplicateName(TaskName),

    /// The rank uniqueness constraint rejected a write.
    #[error("rank uniqueness constraint violated")]
    RankConflict,

    /// A concurrent transaction prevented this one from committing.
    #[error("transaction conflicted with a concurrent writer")]
    WriteConflict,

    /// A stored row does not satisfy the domain rules.
    #[error("corrupt task row {id}: {reason}")]
    CorruptRow {
        /// Raw identifier of the offending row.
        id: i64,
        /// Description of the violated rule.
        reason: String,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Describes a row that breaks a domain rule.
    pub fn corrupt_row(id: i64, reason: impl std::fmt::Display) -> Self {
        Self::CorruptRow {
            id,
            reason: reason.to_string(),
        }
    }
}
