//! Task aggregate and the ordered task list.

use super::{Cost, DueDate, Rank, RankedTask, TaskDomainError, TaskId, TaskName};
use serde::{Deserialize, Serialize};

/// Editable descriptive fields of a task.
///
/// Used both as the draft of a task that has not been stored yet and as the
/// replacement values of an edit. Never carries a rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// Unique task name.
    pub name: TaskName,
    /// Monetary cost.
    pub cost: Cost,
    /// Due date.
    pub due_date: DueDate,
}

impl TaskDetails {
    /// Bundles validated fields.
    #[must_use]
    pub const fn new(name: TaskName, cost: Cost, due_date: DueDate) -> Self {
        Self {
            name,
            cost,
            due_date,
        }
    }
}

/// Persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    cost: Cost,
    due_date: DueDate,
    rank: Rank,
}

impl Task {
    /// Assembles a stored task from its identifier, fields and rank.
    #[must_use]
    pub fn from_persisted(id: TaskId, details: TaskDetails, rank: Rank) -> Self {
        let TaskDetails {
            name,
            cost,
            due_date,
        } = details;
        Self {
            id,
            name,
            cost,
            due_date,
            rank,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the task cost.
    #[must_use]
    pub const fn cost(&self) -> Cost {
        self.cost
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DueDate {
        self.due_date
    }

    /// Returns the current rank.
    #[must_use]
    pub const fn rank(&self) -> Rank {
        self.rank
    }

    /// Returns the identifier and rank pair.
    #[must_use]
    pub const fn ranked(&self) -> RankedTask {
        RankedTask::new(self.id, self.rank)
    }
}

/// Tasks in ascending rank order with their summed cost.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    tasks: Vec<Task>,
    total_cost: Cost,
}

impl TaskList {
    /// Sorts tasks by rank and sums their cost.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CostOverflow`] when the total does not fit
    /// the supported range.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Result<Self, TaskDomainError> {
        tasks.sort_by_key(Task::rank);
        let total_cost = tasks
            .iter()
            .try_fold(Cost::ZERO, |total, task| total.checked_add(task.cost()))?;
        Ok(Self { tasks, total_cost })
    }

    /// Returns the ordered tasks.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the summed cost of all tasks.
    #[must_use]
    pub const fn total_cost(&self) -> Cost {
        self.total_cost
    }

    /// Returns task identifiers in list order.
    #[must_use]
    pub fn ids(&self) -> Vec<TaskId> {
        self.tasks.iter().map(Task::id).collect()
    }

    /// Returns the number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` when no task is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
