//! Service layer for creating, editing, removing and ordering tasks.

use crate::task::{
    domain::{
        Cost, DueDate, MoveDirection, ReorderPlan, Task, TaskDetails, TaskId, TaskList, TaskName,
    },
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::{MoveOutcome, RankSequencer, TaskErrorKind, TaskServiceError, TaskServiceResult};

/// Request payload for creating a task.
///
/// Fields arrive as raw text and are validated by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    cost: String,
    due_date: String,
}

impl CreateTaskRequest {
    /// Creates a request from raw field values.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        cost: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            cost: cost.into(),
            due_date: due_date.into(),
        }
    }
}

/// Request payload for replacing the descriptive fields of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    id: TaskId,
    name: String,
    cost: String,
    due_date: String,
}

impl UpdateTaskRequest {
    /// Creates a request from raw field values.
    #[must_use]
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        cost: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            cost: cost.into(),
            due_date: due_date.into(),
        }
    }
}

/// Request payload for an adjacent move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    id: TaskId,
    direction: String,
}

impl MoveTaskRequest {
    /// Creates a request; `direction` is `"up"` or `"down"`.
    #[must_use]
    pub fn new(id: TaskId, direction: impl Into<String>) -> Self {
        Self {
            id,
            direction: direction.into(),
        }
    }
}

/// Request payload for a full reorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReorderTasksRequest {
    ids: Vec<i64>,
}

impl ReorderTasksRequest {
    /// Creates a request from raw identifiers in the desired final order.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

impl From<&[TaskId]> for ReorderTasksRequest {
    fn from(order: &[TaskId]) -> Self {
        Self::new(order.iter().map(|id| id.value()))
    }
}

/// Ranked task list orchestration service.
///
/// Holds no state of its own: every mutation runs as one store transaction
/// and either commits entirely or leaves the stored list untouched.
#[derive(Clone)]
pub struct TaskService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
}

impl<S, C> TaskService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self { store, clock }
    }

    /// Validates and stores a new task at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a field is invalid, or
    /// [`TaskServiceError::Store`] when the name is taken or the store
    /// rejects the insert.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let CreateTaskRequest {
            name,
            cost,
            due_date,
        } = request;
        let details = self.validate_details(name, &cost, &due_date)?;

        let task = self
            .store
            .run_atomic(move |transaction| -> TaskServiceResult<Task> {
                let rank = RankSequencer::assign_initial_rank(transaction)?;
                let id = transaction.insert(&details, rank)?;
                Ok(Task::from_persisted(id, details, rank))
            })
            .await
            .inspect_err(|err| log_failure("create", err))?;

        info!(task_id = %task.id(), rank = %task.rank(), "task created");
        Ok(task)
    }

    /// Replaces the name, cost and due date of a task. The rank is kept.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a field is invalid, or
    /// [`TaskServiceError::Store`] when the task does not exist or the name
    /// belongs to another task.
    pub async fn update(&self, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let UpdateTaskRequest {
            id,
            name,
            cost,
            due_date,
        } = request;
        let details = self.validate_details(name, &cost, &due_date)?;

        let task = self
            .store
            .run_atomic(move |transaction| -> TaskServiceResult<Task> {
                let current = transaction
                    .find_by_id(id)?
                    .ok_or(TaskStoreError::NotFound(id))?;
                transaction.update_details(id, &details)?;
                Ok(Task::from_persisted(id, details, current.rank()))
            })
            .await
            .inspect_err(|err| log_failure("update", err))?;

        info!(task_id = %task.id(), "task updated");
        Ok(task)
    }

    /// Removes a task and returns it.
    ///
    /// Remaining tasks keep their ranks, so a gap is left where the task
    /// used to be.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the task does not exist or
    /// the store fails.
    pub async fn delete(&self, id: TaskId) -> TaskServiceResult<Task> {
        let removed = self
            .store
            .run_atomic(move |transaction| -> TaskServiceResult<Task> {
                let task = transaction
                    .find_by_id(id)?
                    .ok_or(TaskStoreError::NotFound(id))?;
                transaction.delete(id)?;
                Ok(task)
            })
            .await
            .inspect_err(|err| log_failure("delete", err))?;

        info!(task_id = %removed.id(), rank = %removed.rank(), "task deleted");
        Ok(removed)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the lookup fails.
    pub async fn find(&self, id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Returns every task in rank order together with the total cost.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the lookup fails.
    pub async fn list(&self) -> TaskServiceResult<TaskList> {
        let tasks = self.store.list().await?;
        Ok(TaskList::from_tasks(tasks)?)
    }

    /// Swaps a task with its neighbour above or below.
    ///
    /// At either end of the list the call succeeds and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Direction`] for an unknown direction, or
    /// [`TaskServiceError::Store`] when the task does not exist or a write
    /// fails.
    pub async fn move_adjacent(&self, request: MoveTaskRequest) -> TaskServiceResult<MoveOutcome> {
        let MoveTaskRequest { id, direction } = request;
        let parsed_direction = MoveDirection::try_from(direction.as_str())?;

        let outcome = self
            .store
            .run_atomic(move |transaction| {
                RankSequencer::swap_adjacent(transaction, id, parsed_direction)
            })
            .await
            .inspect_err(|err| log_failure("move_adjacent", err))?;

        match outcome {
            MoveOutcome::Swapped { task, neighbour } => info!(
                task_id = %task.id,
                rank = %task.rank,
                neighbour_id = %neighbour.id,
                neighbour_rank = %neighbour.rank,
                direction = %parsed_direction,
                "task moved"
            ),
            MoveOutcome::AtBoundary { task } => debug!(
                task_id = %task.id,
                direction = %parsed_direction,
                "task already at list boundary"
            ),
        }
        Ok(outcome)
    }

    /// Reassigns ranks `1..=N` in the order given by the request.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::InvalidOrder`] when the identifiers are
    /// malformed or are not exactly the stored tasks, or
    /// [`TaskServiceError::Store`] when a write fails.
    pub async fn reorder(&self, request: ReorderTasksRequest) -> TaskServiceResult<()> {
        let order = ReorderPlan::parse_ids(&request.ids)?;

        let plan = self
            .store
            .run_atomic(move |transaction| RankSequencer::reorder_full(transaction, order))
            .await
            .inspect_err(|err| log_failure("reorder", err))?;

        info!(tasks = plan.order().len(), "tasks reordered");
        Ok(())
    }

    fn validate_details(
        &self,
        name: String,
        cost: &str,
        due_date: &str,
    ) -> TaskServiceResult<TaskDetails> {
        let today = self.clock.local().date_naive();
        let task_name = TaskName::new(name)?;
        let parsed_cost = Cost::parse(cost)?;
        let parsed_due_date = DueDate::parse(due_date)?.ensure_not_before(today)?;
        Ok(TaskDetails::new(task_name, parsed_cost, parsed_due_date))
    }
}

fn log_failure(operation: &'static str, err: &TaskServiceError) {
    match err.kind() {
        TaskErrorKind::ConstraintViolation | TaskErrorKind::StoreUnavailable => {
            warn!(operation, kind = %err.kind(), error = %err, "transaction rolled back");
        }
        TaskErrorKind::NotFound | TaskErrorKind::InvalidInput | TaskErrorKind::Conflict => {
            debug!(operation, kind = %err.kind(), error = %err, "request rejected");
        }
    }
}
