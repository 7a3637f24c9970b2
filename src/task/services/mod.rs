//! Application services for ranked task lists.

mod error;
mod sequencer;
mod tasks;

pub use error::{TaskErrorKind, TaskServiceError, TaskServiceResult};
pub use sequencer::{MoveOutcome, RankSequencer};
pub use tasks::{
    CreateTaskRequest, MoveTaskRequest, ReorderTasksRequest, TaskService, UpdateTaskRequest,
};
