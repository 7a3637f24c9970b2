//! `PostgreSQL` store implementation for ranked tasks.
//!
//! Each call to [`TaskStore::run_atomic`] checks a connection out of the pool
//! on the blocking thread pool and runs the work inside a `SERIALIZABLE`
//! transaction. The `UNIQUE (rank)` constraint is checked per statement, so
//! the temporary-rank write plans are what keep multi-row exchanges legal.

use super::{
    models::{NewTaskRow, TaskDetailsChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        Cost, DueDate, Rank, RankAssignment, RankBound, RankedTask, Task, TaskDetails, TaskId,
        TaskName,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult, TaskTransaction},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by the task store.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Statements creating the `tasks` table and its constraints.
const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-18-000000_create_tasks/up.sql");

const RANK_UNIQUE_CONSTRAINT: &str = "tasks_rank_key";
const NAME_UNIQUE_CONSTRAINT: &str = "tasks_name_key";

/// Creates the `tasks` table when it does not exist yet.
///
/// # Errors
///
/// Returns [`TaskStoreError::Persistence`] when the statements fail.
pub fn apply_schema(connection: &mut PgConnection) -> TaskStoreResult<()> {
    connection
        .batch_execute(CREATE_TASKS_SQL)
        .map_err(TaskStoreError::persistence)
}

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &TaskPgPool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

/// Failure of a transaction body: either the caller's work or Diesel itself.
enum TransactionFailure<E> {
    Work(E),
    Database(DieselError),
}

impl<E> From<DieselError> for TransactionFailure<E> {
    fn from(err: DieselError) -> Self {
        Self::Database(err)
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn run_atomic<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut dyn TaskTransaction) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<TaskStoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| E::from(TaskStoreError::persistence(err)))?;
            connection
                .build_transaction()
                .serializable()
                .run(|tx_connection| {
                    let mut transaction = PgTaskTransaction {
                        connection: tx_connection,
                    };
                    work(&mut transaction).map_err(TransactionFailure::Work)
                })
                .map_err(|failure| match failure {
                    TransactionFailure::Work(err) => err,
                    TransactionFailure::Database(err) => E::from(map_diesel_error(err)),
                })
        })
        .await
        .map_err(|err| E::from(TaskStoreError::persistence(err)))?
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| select_task(connection, id))
            .await
    }

    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(|connection| {
            tasks::table
                .order(tasks::rank.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(map_diesel_error)?
                .into_iter()
                .map(row_to_task)
                .collect()
        })
        .await
    }
}

/// Transaction handle over a connection with an open transaction.
struct PgTaskTransaction<'a> {
    connection: &'a mut PgConnection,
}

impl TaskTransaction for PgTaskTransaction<'_> {
    fn find_by_id(&mut self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        select_task(self.connection, id)
    }

    fn find_by_rank(&mut self, bound: RankBound) -> TaskStoreResult<Option<RankedTask>> {
        let pivot = bound.pivot().value();
        let candidates = tasks::table
            .select((tasks::id, tasks::rank))
            .into_boxed();
        let nearest = match bound {
            RankBound::Below(_) => candidates
                .filter(tasks::rank.lt(pivot))
                .order(tasks::rank.desc()),
            RankBound::Above(_) => candidates
                .filter(tasks::rank.gt(pivot))
                .order(tasks::rank.asc()),
        };
        let row = nearest
            .first::<(i64, i64)>(self.connection)
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|(id, rank)| ranked_from_columns(id, rank))
            .transpose()
    }

    fn count(&mut self) -> TaskStoreResult<u64> {
        let total = tasks::table
            .count()
            .get_result::<i64>(self.connection)
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(TaskStoreError::persistence)
    }

    fn max_rank(&mut self) -> TaskStoreResult<Option<Rank>> {
        let highest = tasks::table
            .select((tasks::id, tasks::rank))
            .order(tasks::rank.desc())
            .first::<(i64, i64)>(self.connection)
            .optional()
            .map_err(map_diesel_error)?;
        highest
            .map(|(id, rank)| ranked_from_columns(id, rank).map(|ranked| ranked.rank))
            .transpose()
    }

    fn insert(&mut self, details: &TaskDetails, rank: Rank) -> TaskStoreResult<TaskId> {
        let new_row = NewTaskRow {
            name: details.name.as_str(),
            cost_cents: cost_to_column(details.cost)?,
            due_date: details.due_date.date(),
            rank: rank.value(),
        };
        let id = diesel::insert_into(tasks::table)
            .values(&new_row)
            .returning(tasks::id)
            .get_result::<i64>(self.connection)
            .map_err(|err| map_write_error(err, &details.name))?;
        TaskId::new(id).map_err(|err| TaskStoreError::corrupt_row(id, err))
    }

    fn update_details(&mut self, id: TaskId, details: &TaskDetails) -> TaskStoreResult<u64> {
        let changeset = TaskDetailsChangeset {
            name: details.name.as_str(),
            cost_cents: cost_to_column(details.cost)?,
            due_date: details.due_date.date(),
        };
        let affected = diesel::update(tasks::table.find(id.value()))
            .set(&changeset)
            .execute(self.connection)
            .map_err(|err| map_write_error(err, &details.name))?;
        affected_rows(affected)
    }

    fn update_rank(&mut self, id: TaskId, assignment: RankAssignment) -> TaskStoreResult<u64> {
        let affected = diesel::update(tasks::table.find(id.value()))
            .set(tasks::rank.eq(assignment.value()))
            .execute(self.connection)
            .map_err(map_diesel_error)?;
        affected_rows(affected)
    }

    fn delete(&mut self, id: TaskId) -> TaskStoreResult<u64> {
        let affected = diesel::delete(tasks::table.find(id.value()))
            .execute(self.connection)
            .map_err(map_diesel_error)?;
        affected_rows(affected)
    }
}

fn select_task(connection: &mut PgConnection, id: TaskId) -> TaskStoreResult<Option<Task>> {
    let row = tasks::table
        .find(id.value())
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()
        .map_err(map_diesel_error)?;
    row.map(row_to_task).transpose()
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id: raw_id,
        name: persisted_name,
        cost_cents,
        due_date,
        rank: raw_rank,
    } = row;

    let corrupt = |err: crate::task::domain::TaskDomainError| {
        TaskStoreError::corrupt_row(raw_id, err)
    };
    let id = TaskId::new(raw_id).map_err(corrupt)?;
    let name = TaskName::new(persisted_name).map_err(corrupt)?;
    let cents = u64::try_from(cost_cents)
        .map_err(|err| TaskStoreError::corrupt_row(raw_id, err))?;
    let cost = Cost::from_cents(cents).map_err(corrupt)?;
    let rank = Rank::new(raw_rank).map_err(corrupt)?;

    let details = TaskDetails::new(name, cost, DueDate::from_date(due_date));
    Ok(Task::from_persisted(id, details, rank))
}

fn ranked_from_columns(raw_id: i64, raw_rank: i64) -> TaskStoreResult<RankedTask> {
    let id = TaskId::new(raw_id).map_err(|err| TaskStoreError::corrupt_row(raw_id, err))?;
    let rank = Rank::new(raw_rank).map_err(|err| TaskStoreError::corrupt_row(raw_id, err))?;
    Ok(RankedTask::new(id, rank))
}

fn cost_to_column(cost: Cost) -> TaskStoreResult<i64> {
    i64::try_from(cost.cents()).map_err(TaskStoreError::persistence)
}

fn affected_rows(affected: usize) -> TaskStoreResult<u64> {
    u64::try_from(affected).map_err(TaskStoreError::persistence)
}

fn violated_constraint(info: &dyn DatabaseErrorInformation, constraint: &str) -> bool {
    info.constraint_name().is_some_and(|name| name == constraint)
}

/// Maps Diesel failures onto the store taxonomy.
fn map_diesel_error(err: DieselError) -> TaskStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            TaskStoreError::WriteConflict
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violated_constraint(info.as_ref(), RANK_UNIQUE_CONSTRAINT) =>
        {
            TaskStoreError::RankConflict
        }
        _ => TaskStoreError::persistence(err),
    }
}

/// Maps failures of writes that carry a task name.
fn map_write_error(err: DieselError, name: &TaskName) -> TaskStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if violated_constraint(info.as_ref(), NAME_UNIQUE_CONSTRAINT) =>
        {
            TaskStoreError::DuplicateName(name.clone())
        }
        _ => map_diesel_error(err),
    }
}
