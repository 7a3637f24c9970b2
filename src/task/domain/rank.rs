//! Rank values and the temporary namespace used while ranks are exchanged.
//!
//! Final ranks are strictly positive. Every other integer is reserved for
//! temporary placeholders, so a row parked on a [`TemporaryRank`] can never
//! collide with a row holding a real [`Rank`].

use super::{TaskDomainError, TaskId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a task in the user-visible ordered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rank(i64);

impl Rank {
    /// Rank given to the first task of an empty list.
    pub const FIRST: Self = Self(1);

    /// Creates a validated rank.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidRank`] when the value is not
    /// positive.
    pub const fn new(value: i64) -> Result<Self, TaskDomainError> {
        if value <= 0 {
            return Err(TaskDomainError::InvalidRank(value));
        }
        Ok(Self(value))
    }

    /// Returns the 1-based rank for a 0-based list position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RankOverflow`] when the position does not
    /// fit the persisted range.
    pub fn from_position(position: usize) -> Result<Self, TaskDomainError> {
        let value = i64::try_from(position)
            .ok()
            .and_then(|offset| offset.checked_add(1))
            .ok_or(TaskDomainError::RankOverflow)?;
        Ok(Self(value))
    }

    /// Returns the rank immediately after this one.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RankOverflow`] at the top of the range.
    pub const fn next(self) -> Result<Self, TaskDomainError> {
        match self.0.checked_add(1) {
            Some(value) => Ok(Self(value)),
            None => Err(TaskDomainError::RankOverflow),
        }
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Rank {
    type Error = TaskDomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rank> for i64 {
    fn from(rank: Rank) -> Self {
        rank.value()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placeholder rank drawn from the reserved non-positive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemporaryRank(i64);

impl TemporaryRank {
    /// Sentinel used to park the target of an adjacent swap.
    pub const SWAP: Self = Self(-1);

    /// Creates a validated temporary rank.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTemporaryRank`] when the value is
    /// not negative.
    pub const fn new(value: i64) -> Result<Self, TaskDomainError> {
        if value >= 0 {
            return Err(TaskDomainError::InvalidTemporaryRank(value));
        }
        Ok(Self(value))
    }

    /// Returns the distinct placeholder `-(position + 1)` for a list
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::RankOverflow`] when the position does not
    /// fit the persisted range.
    pub fn for_position(position: usize) -> Result<Self, TaskDomainError> {
        let rank = Rank::from_position(position)?;
        Ok(Self(-rank.value()))
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

/// Value written to a task's rank column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankAssignment {
    /// A real, user-visible rank.
    Final(Rank),
    /// A placeholder that only exists inside an open transaction.
    Temporary(TemporaryRank),
}

impl RankAssignment {
    /// Returns the raw value stored in the rank column.
    #[must_use]
    pub const fn value(self) -> i64 {
        match self {
            Self::Final(rank) => rank.value(),
            Self::Temporary(rank) => rank.value(),
        }
    }

    /// Returns `true` for placeholder assignments.
    #[must_use]
    pub const fn is_temporary(self) -> bool {
        matches!(self, Self::Temporary(_))
    }
}

impl From<Rank> for RankAssignment {
    fn from(rank: Rank) -> Self {
        Self::Final(rank)
    }
}

impl From<TemporaryRank> for RankAssignment {
    fn from(rank: TemporaryRank) -> Self {
        Self::Temporary(rank)
    }
}

/// Identifier and rank of a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RankedTask {
    /// Task identifier.
    pub id: TaskId,
    /// Current rank.
    pub rank: Rank,
}

impl RankedTask {
    /// Pairs an identifier with a rank.
    #[must_use]
    pub const fn new(id: TaskId, rank: Rank) -> Self {
        Self { id, rank }
    }
}

/// One write to the rank column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RankWrite {
    /// Task whose rank is written.
    pub task_id: TaskId,
    /// Value written.
    pub assignment: RankAssignment,
}

impl RankWrite {
    /// Creates a rank write.
    #[must_use]
    pub fn new(task_id: TaskId, assignment: impl Into<RankAssignment>) -> Self {
        Self {
            task_id,
            assignment: assignment.into(),
        }
    }
}
