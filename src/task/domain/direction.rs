//! Adjacent move directions.

use super::{ParseMoveDirectionError, Rank};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an adjacent move in the ordered list.
///
/// `Up` moves a task towards rank 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    /// Towards the start of the list.
    Up,
    /// Towards the end of the list.
    Down,
}

impl MoveDirection {
    /// Returns the canonical text representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Returns the rank search that locates the neighbour in this direction.
    #[must_use]
    pub const fn neighbour_of(self, rank: Rank) -> RankBound {
        match self {
            Self::Up => RankBound::Below(rank),
            Self::Down => RankBound::Above(rank),
        }
    }
}

impl TryFrom<&str> for MoveDirection {
    type Error = ParseMoveDirectionError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            _ => Err(ParseMoveDirectionError(value.to_owned())),
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nearest-rank search relative to a pivot rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RankBound {
    /// The task with the greatest rank strictly below the pivot.
    Below(Rank),
    /// The task with the least rank strictly above the pivot.
    Above(Rank),
}

impl RankBound {
    /// Returns the pivot rank.
    #[must_use]
    pub const fn pivot(self) -> Rank {
        match self {
            Self::Below(rank) | Self::Above(rank) => rank,
        }
    }
}
