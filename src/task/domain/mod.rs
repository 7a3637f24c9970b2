//! Domain model for ranked task lists.
//!
//! Holds the validated task fields, the rank namespace (final ranks and the
//! reserved temporary range), and the write plans that move tasks around the
//! list without ever sharing a rank. Infrastructure concerns stay outside of
//! the domain boundary.

mod direction;
mod error;
mod fields;
mod ids;
mod plan;
mod rank;
mod task;

pub use direction::{MoveDirection, RankBound};
pub use error::{ParseMoveDirectionError, ReorderError, TaskDomainError};
pub use fields::{Cost, DueDate, TaskName};
pub use ids::TaskId;
pub use plan::{ReorderPlan, SwapPlan};
pub use rank::{Rank, RankAssignment, RankWrite, RankedTask, TemporaryRank};
pub use task::{Task, TaskDetails, TaskList};
