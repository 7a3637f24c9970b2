//! Shared test helpers for in-memory store integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use tasklist::task::{
    adapters::memory::InMemoryTaskStore,
    domain::{Rank, RankAssignment, RankBound, RankedTask, Task, TaskDetails, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskTransaction},
    services::{CreateTaskRequest, TaskService},
};

/// Due date far enough ahead to stay valid against the real clock.
pub const FAR_DUE_DATE: &str = "2999-12-31";

/// Service backed by a plain in-memory store.
pub type MemoryService = TaskService<InMemoryTaskStore, DefaultClock>;

/// Provides a service over an empty in-memory store.
#[fixture]
pub fn service() -> MemoryService {
    TaskService::new(Arc::new(InMemoryTaskStore::new()), Arc::new(DefaultClock))
}

/// Creates one task per name, in order, and returns their identifiers.
///
/// # Errors
///
/// Returns an error if any creation fails.
pub async fn seed<S>(
    service: &TaskService<S, DefaultClock>,
    names: &[&str],
) -> Result<Vec<TaskId>, eyre::Report>
where
    S: TaskStore,
{
    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let task = service
            .create(CreateTaskRequest::new(*name, "1.00", FAR_DUE_DATE))
            .await
            .map_err(|err| eyre::eyre!("create {name}: {err}"))?;
        ids.push(task.id());
    }
    Ok(ids)
}

/// Returns `(id, rank)` pairs in list order.
///
/// # Errors
///
/// Returns an error if the list cannot be read.
pub async fn ranks<S>(
    service: &TaskService<S, DefaultClock>,
) -> Result<Vec<(TaskId, i64)>, eyre::Report>
where
    S: TaskStore,
{
    let list = service
        .list()
        .await
        .map_err(|err| eyre::eyre!("list tasks: {err}"))?;
    Ok(list
        .tasks()
        .iter()
        .map(|task| (task.id(), task.rank().value()))
        .collect())
}

/// Store wrapper that fails the `fail_at`-th rank write of every
/// transaction.
#[derive(Debug, Clone, Default)]
pub struct FaultyStore {
    inner: InMemoryTaskStore,
    fail_at: Option<usize>,
}

impl FaultyStore {
    /// Wraps `inner` without injecting faults.
    #[must_use]
    pub const fn new(inner: InMemoryTaskStore) -> Self {
        Self {
            inner,
            fail_at: None,
        }
    }

    /// Returns a copy sharing the same state that fails rank write
    /// `fail_at` (1-based).
    #[must_use]
    pub fn failing_at(&self, fail_at: usize) -> Self {
        Self {
            inner: self.inner.clone(),
            fail_at: Some(fail_at),
        }
    }
}

struct FaultyTransaction<'a> {
    inner: &'a mut dyn TaskTransaction,
    fail_at: Option<usize>,
    rank_writes: usize,
}

impl TaskTransaction for FaultyTransaction<'_> {
    fn find_by_id(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.inner.find_by_id(id)
    }

    fn find_by_rank(&mut self, bound: RankBound) -> TaskStoreResult<Option<RankedTask>> {
        self.inner.find_by_rank(bound)
    }

    fn count(&mut self) -> TaskStoreResult<u64> {
        self.inner.count()
    }

    fn max_rank(&mut self) -> TaskStoreResult<Option<Rank>> {
        self.inner.max_rank()
    }

    fn insert(&mut self, details: &TaskDetails, rank: Rank) -> TaskStoreResult<TaskId> {
        self.inner.insert(details, rank)
    }

    fn update_details(&mut self, id: TaskId, details: &TaskDetails) -> TaskStoreResult<u64> {
        self.inner.update_details(id, details)
    }

    fn update_rank(&mut self, id: TaskId, assignment: RankAssignment) -> TaskStoreResult<u64> {
        self.rank_writes += 1;
        if Some(self.rank_writes) == self.fail_at {
            return Err(TaskStoreError::persistence(std::io::Error::other(
                "simulated store fault",
            )));
        }
        self.inner.update_rank(id, assignment)
    }

    fn delete(&mut self, id: TaskId) -> TaskStoreResult<u64> {
        self.inner.delete(id)
    }
}

#[async_trait]
impl TaskStore for FaultyStore {
    async fn run_atomic<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static,
    {
        let fail_at = self.fail_at;
        self.inner
            .run_atomic(move |transaction| {
                let mut faulty = FaultyTransaction {
                    inner: transaction,
                    fail_at,
                    rank_writes: 0,
                };
                work(&mut faulty)
            })
            .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.inner.find_by_id(id).await
    }

    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        self.inner.list().await
    }
}
