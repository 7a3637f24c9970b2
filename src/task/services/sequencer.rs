//! Rank sequencer.
//!
//! Stateless owner of every rank assignment. Each operation reads the ranks
//! it needs and writes the new ones through the same open transaction, so the
//! caller's [`TaskStore::run_atomic`](crate::task::ports::TaskStore::run_atomic)
//! boundary covers the whole read-compute-write cycle.

use crate::task::{
    domain::{
        MoveDirection, Rank, RankWrite, RankedTask, ReorderError, ReorderPlan, SwapPlan, TaskId,
    },
    ports::{TaskStoreError, TaskStoreResult, TaskTransaction},
};
use serde::Serialize;

use super::TaskServiceResult;

/// Result of an adjacent move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    /// The task exchanged ranks with its neighbour.
    Swapped {
        /// The moved task with its new rank.
        task: RankedTask,
        /// The neighbour with its new rank.
        neighbour: RankedTask,
    },
    /// The task already sits at the end of the list in that direction.
    AtBoundary {
        /// The unmoved task.
        task: RankedTask,
    },
}

impl MoveOutcome {
    const fn swapped(plan: &SwapPlan) -> Self {
        let target = plan.target();
        let neighbour = plan.neighbour();
        Self::Swapped {
            task: RankedTask::new(target.id, neighbour.rank),
            neighbour: RankedTask::new(neighbour.id, target.rank),
        }
    }
}

/// Rank assignment and mutation protocols.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankSequencer;

impl RankSequencer {
    /// Returns the rank for a task about to be inserted: one past the
    /// current maximum, or [`Rank::FIRST`] for an empty list.
    ///
    /// # Errors
    ///
    /// Returns a store error when the maximum cannot be read, or
    /// [`TaskDomainError::RankOverflow`](crate::task::domain::TaskDomainError::RankOverflow)
    /// at the top of the range.
    pub fn assign_initial_rank(transaction: &mut dyn TaskTransaction) -> TaskServiceResult<Rank> {
        match transaction.max_rank()? {
            Some(max) => Ok(max.next()?),
            None => Ok(Rank::FIRST),
        }
    }

    /// Exchanges the rank of `id` with its neighbour in `direction`.
    ///
    /// Moving past either end of the list succeeds without writing anything.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist, or
    /// any store error raised by the writes.
    pub fn swap_adjacent(
        transaction: &mut dyn TaskTransaction,
        id: TaskId,
        direction: MoveDirection,
    ) -> TaskServiceResult<MoveOutcome> {
        let target = transaction
            .find_by_id(id)?
            .ok_or(TaskStoreError::NotFound(id))?
            .ranked();
        let Some(neighbour) = transaction.find_by_rank(direction.neighbour_of(target.rank))? else {
            return Ok(MoveOutcome::AtBoundary { task: target });
        };

        let plan = SwapPlan::new(target, neighbour);
        for write in plan.writes() {
            apply_write(transaction, write)?;
        }

        Ok(MoveOutcome::swapped(&plan))
    }

    /// Reassigns ranks `1..=N` following `order`.
    ///
    /// The first pass parks every listed task on a distinct negative rank;
    /// the second settles each on its final rank. An identifier that matches
    /// no row during the first pass aborts the transaction.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError`] when `order` is not a permutation of the
    /// stored tasks, or any store error raised by the writes.
    pub fn reorder_full(
        transaction: &mut dyn TaskTransaction,
        order: Vec<TaskId>,
    ) -> TaskServiceResult<ReorderPlan> {
        let stored = transaction.count()?;
        let plan = ReorderPlan::new(order, stored)?;

        for write in plan.temporary_pass()? {
            if transaction.update_rank(write.task_id, write.assignment)? == 0 {
                return Err(ReorderError::UnknownId(write.task_id).into());
            }
        }
        for write in plan.final_pass()? {
            apply_write(transaction, write)?;
        }

        Ok(plan)
    }
}

/// Applies one write that must hit exactly one existing row.
fn apply_write(transaction: &mut dyn TaskTransaction, write: RankWrite) -> TaskStoreResult<()> {
    match transaction.update_rank(write.task_id, write.assignment)? {
        0 => Err(TaskStoreError::NotFound(write.task_id)),
        _ => Ok(()),
    }
}
