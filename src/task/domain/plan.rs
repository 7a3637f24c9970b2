//! Rank write plans.
//!
//! A plan is the exact sequence of rank writes for one mutation. Plans route
//! every exchange through [`TemporaryRank`] values, so applying the writes in
//! order never leaves two rows on the same rank, not even between two
//! statements of the same transaction.

use super::{Rank, RankWrite, RankedTask, ReorderError, TaskDomainError, TaskId, TemporaryRank};
use std::collections::HashSet;

/// Exchange of ranks between a task and its neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapPlan {
    target: RankedTask,
    neighbour: RankedTask,
}

impl SwapPlan {
    /// Plans the exchange of `target`'s rank with `neighbour`'s rank.
    #[must_use]
    pub const fn new(target: RankedTask, neighbour: RankedTask) -> Self {
        Self { target, neighbour }
    }

    /// Returns the moved task with its rank before the swap.
    #[must_use]
    pub const fn target(&self) -> RankedTask {
        self.target
    }

    /// Returns the neighbour with its rank before the swap.
    #[must_use]
    pub const fn neighbour(&self) -> RankedTask {
        self.neighbour
    }

    /// Returns the three writes: park the target on the swap sentinel, move
    /// the neighbour onto the target's rank, then settle the target on the
    /// neighbour's old rank.
    #[must_use]
    pub fn writes(&self) -> [RankWrite; 3] {
        [
            RankWrite::new(self.target.id, TemporaryRank::SWAP),
            RankWrite::new(self.neighbour.id, self.target.rank),
            RankWrite::new(self.target.id, self.neighbour.rank),
        ]
    }
}

/// Full reassignment of ranks `1..=N` following a caller-supplied order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderPlan {
    order: Vec<TaskId>,
}

impl ReorderPlan {
    /// Converts raw identifiers into task identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError::MalformedId`] for the first value that is not
    /// a positive integer.
    pub fn parse_ids(raw: &[i64]) -> Result<Vec<TaskId>, ReorderError> {
        raw.iter()
            .map(|&value| TaskId::new(value).map_err(|_| ReorderError::MalformedId(value)))
            .collect()
    }

    /// Validates an order against the number of stored tasks.
    ///
    /// The order must be non-empty, free of duplicates and exactly as long as
    /// the stored collection. Membership of each identifier is confirmed by
    /// the store while the plan is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReorderError::EmptyOrder`], [`ReorderError::CountMismatch`]
    /// or [`ReorderError::DuplicateId`].
    pub fn new(order: Vec<TaskId>, stored_count: u64) -> Result<Self, ReorderError> {
        if order.is_empty() {
            return Err(ReorderError::EmptyOrder);
        }
        let matches_count = u64::try_from(order.len()).is_ok_and(|len| len == stored_count);
        if !matches_count {
            return Err(ReorderError::CountMismatch {
                expected: stored_count,
                actual: order.len(),
            });
        }
        let mut seen = HashSet::with_capacity(order.len());
        if let Some(duplicate) = order.iter().find(|id| !seen.insert(**id)) {
            return Err(ReorderError::DuplicateId(*duplicate));
        }
        Ok(Self { order })
    }

    /// Returns the requested order.
    #[must_use]
    pub fn order(&self) -> &[TaskId] {
        &self.order
    }

    /// Returns the first pass: every task parked on `-(position + 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RankOverflow`] when a position does not fit
    /// the persisted range.
    pub fn temporary_pass(&self) -> Result<Vec<RankWrite>, TaskDomainError> {
        self.order
            .iter()
            .enumerate()
            .map(|(position, &id)| Ok(RankWrite::new(id, TemporaryRank::for_position(position)?)))
            .collect()
    }

    /// Returns the second pass: every task settled on `position + 1`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RankOverflow`] when a position does not fit
    /// the persisted range.
    pub fn final_pass(&self) -> Result<Vec<RankWrite>, TaskDomainError> {
        self.order
            .iter()
            .enumerate()
            .map(|(position, &id)| Ok(RankWrite::new(id, Rank::from_position(position)?)))
            .collect()
    }
}
