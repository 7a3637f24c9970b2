//! In-memory task store.
//!
//! Transactions run against a private copy of the committed state while the
//! store lock is held, and replace the committed state only when their work
//! succeeds. Uniqueness of ranks and names is checked on every write, so the
//! adapter rejects the same intermediate states a database constraint would.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        Rank, RankAssignment, RankBound, RankedTask, Task, TaskDetails, TaskId, TaskName,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskTransaction},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryTaskState {
    rows: BTreeMap<TaskId, StoredTask>,
    last_id: i64,
}

/// Row as stored; the rank may be temporary while a transaction is open.
#[derive(Debug, Clone)]
struct StoredTask {
    details: TaskDetails,
    rank: i64,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn to_task(id: TaskId, row: &StoredTask) -> TaskStoreResult<Task> {
    let rank = Rank::new(row.rank).map_err(|err| TaskStoreError::corrupt_row(id.value(), err))?;
    Ok(Task::from_persisted(id, row.details.clone(), rank))
}

fn to_ranked(id: TaskId, raw_rank: i64) -> TaskStoreResult<RankedTask> {
    let rank = Rank::new(raw_rank).map_err(|err| TaskStoreError::corrupt_row(id.value(), err))?;
    Ok(RankedTask::new(id, rank))
}

impl InMemoryTaskState {
    fn name_taken(&self, name: &TaskName, except: Option<TaskId>) -> bool {
        self.rows
            .iter()
            .any(|(id, row)| Some(*id) != except && row.details.name == *name)
    }

    fn rank_taken(&self, rank: i64, except: Option<TaskId>) -> bool {
        self.rows
            .iter()
            .any(|(id, row)| Some(*id) != except && row.rank == rank)
    }

    fn ordered(&self) -> TaskStoreResult<Vec<Task>> {
        let mut tasks = self
            .rows
            .iter()
            .map(|(id, row)| to_task(*id, row))
            .collect::<TaskStoreResult<Vec<_>>>()?;
        tasks.sort_by_key(Task::rank);
        Ok(tasks)
    }
}

/// Open transaction over a private copy of the store state.
struct InMemoryTransaction {
    state: InMemoryTaskState,
}

impl TaskTransaction for InMemoryTransaction {
    fn find_by_id(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.state
            .rows
            .get(&id)
            .map(|row| to_task(id, row))
            .transpose()
    }

    fn find_by_rank(&mut self, bound: RankBound) -> TaskStoreResult<Option<RankedTask>> {
        let pivot = bound.pivot().value();
        let rows = self.state.rows.iter().map(|(id, row)| (*id, row.rank));
        let nearest = match bound {
            RankBound::Below(_) => rows
                .filter(|(_, rank)| *rank < pivot)
                .max_by_key(|(_, rank)| *rank),
            RankBound::Above(_) => rows
                .filter(|(_, rank)| *rank > pivot)
                .min_by_key(|(_, rank)| *rank),
        };
        nearest.map(|(id, rank)| to_ranked(id, rank)).transpose()
    }

    fn count(&mut self) -> TaskStoreResult<u64> {
        u64::try_from(self.state.rows.len()).map_err(TaskStoreError::persistence)
    }

    fn max_rank(&mut self) -> TaskStoreResult<Option<Rank>> {
        let Some((id, raw_rank)) = self
            .state
            .rows
            .iter()
            .map(|(id, row)| (*id, row.rank))
            .max_by_key(|(_, rank)| *rank)
        else {
            return Ok(None);
        };
        Ok(Some(to_ranked(id, raw_rank)?.rank))
    }

    fn insert(&mut self, details: &TaskDetails, rank: Rank) -> TaskStoreResult<TaskId> {
        if self.state.name_taken(&details.name, None) {
            return Err(TaskStoreError::DuplicateName(details.name.clone()));
        }
        if self.state.rank_taken(rank.value(), None) {
            return Err(TaskStoreError::RankConflict);
        }

        let next_id = self
            .state
            .last_id
            .checked_add(1)
            .ok_or_else(|| poisoned("task identifier sequence exhausted"))?;
        let id = TaskId::new(next_id).map_err(TaskStoreError::persistence)?;
        self.state.last_id = next_id;
        self.state.rows.insert(
            id,
            StoredTask {
                details: details.clone(),
                rank: rank.value(),
            },
        );
        Ok(id)
    }

    fn update_details(&mut self, id: TaskId, details: &TaskDetails) -> TaskStoreResult<u64> {
        if !self.state.rows.contains_key(&id) {
            return Ok(0);
        }
        if self.state.name_taken(&details.name, Some(id)) {
            return Err(TaskStoreError::DuplicateName(details.name.clone()));
        }
        let Some(row) = self.state.rows.get_mut(&id) else {
            return Ok(0);
        };
        row.details = details.clone();
        Ok(1)
    }

    fn update_rank(&mut self, id: TaskId, assignment: RankAssignment) -> TaskStoreResult<u64> {
        if !self.state.rows.contains_key(&id) {
            return Ok(0);
        }
        if self.state.rank_taken(assignment.value(), Some(id)) {
            return Err(TaskStoreError::RankConflict);
        }
        let Some(row) = self.state.rows.get_mut(&id) else {
            return Ok(0);
        };
        row.rank = assignment.value();
        Ok(1)
    }

    fn delete(&mut self, id: TaskId) -> TaskStoreResult<u64> {
        Ok(u64::from(self.state.rows.remove(&id).is_some()))
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn run_atomic<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static,
    {
        let mut committed = self.state.write().map_err(poisoned)?;
        let mut transaction = InMemoryTransaction {
            state: committed.clone(),
        };
        let output = work(&mut transaction)?;
        *committed = transaction.state;
        Ok(output)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        state.rows.get(&id).map(|row| to_task(id, row)).transpose()
    }

    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned)?;
        state.ordered()
    }
}
