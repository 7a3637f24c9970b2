//! Shared helpers for `PostgreSQL` store integration tests.

pub use super::cluster::{BoxError, PostgresCluster, postgres_cluster};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tasklist::task::{
    adapters::postgres::{PostgresTaskStore, apply_schema},
    domain::TaskId,
    services::{CreateTaskRequest, TaskService},
};
use tokio::runtime::Runtime;

/// Database holding the migrated schema that test databases are copied from.
pub const TEMPLATE_DB: &str = "tasklist_test_template";

/// Due date far enough ahead to stay valid against the real clock.
pub const FAR_DUE_DATE: &str = "2999-12-31";

/// Service backed by the `PostgreSQL` store.
pub type PgService = TaskService<PostgresTaskStore, DefaultClock>;

static DATABASE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Boxes any error for the cluster and fixture plumbing.
pub fn boxed(err: impl std::error::Error + Send + Sync + 'static) -> BoxError {
    Box::new(err)
}

/// Builds the runtime tests drive the async store with.
pub fn test_runtime() -> Result<Runtime, BoxError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(boxed)
}

/// Ensures the template database exists with the `tasks` schema applied.
pub fn ensure_template(cluster: PostgresCluster) -> Result<(), BoxError> {
    cluster.ensure_template_exists(TEMPLATE_DB, |template| {
        let mut connection =
            PgConnection::establish(&cluster.database_url(template)).map_err(boxed)?;
        apply_schema(&mut connection).map_err(boxed)
    })
}

/// Database copied from the template and dropped with the guard.
pub struct TestDatabase {
    cluster: PostgresCluster,
    name: String,
}

impl TestDatabase {
    /// Copies the template into a database with a name unique to this run.
    pub fn from_template(cluster: PostgresCluster) -> Result<Self, BoxError> {
        ensure_template(cluster)?;
        let name = format!(
            "tasklist_test_{}_{}",
            std::process::id(),
            DATABASE_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        cluster.create_database_from_template(&name, TEMPLATE_DB)?;
        Ok(Self { cluster, name })
    }

    /// Returns a store over a pool of at most `pool_size` connections.
    pub fn store(&self, pool_size: u32) -> Result<PostgresTaskStore, BoxError> {
        let manager = ConnectionManager::<PgConnection>::new(self.cluster.database_url(&self.name));
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(boxed)?;
        Ok(PostgresTaskStore::new(pool))
    }
}

impl Drop for TestDatabase {
    fn drop(&mut self) {
        drop(self.cluster.drop_database(&self.name));
    }
}

/// Store, service and runtime over a fresh database.
///
/// Fields drop in declaration order, so the pool closes before the database
/// is dropped.
pub struct PreparedStore {
    /// Store shared with the service.
    pub store: Arc<PostgresTaskStore>,
    /// Service over `store`.
    pub service: PgService,
    /// Runtime the test blocks on.
    pub runtime: Runtime,
    _database: TestDatabase,
}

impl PreparedStore {
    /// Creates a database from the template and wires a service over it.
    pub fn new(cluster: PostgresCluster, pool_size: u32) -> Result<Self, BoxError> {
        let database = TestDatabase::from_template(cluster)?;
        let store = Arc::new(database.store(pool_size)?);
        let service = TaskService::new(Arc::clone(&store), Arc::new(DefaultClock));
        Ok(Self {
            store,
            service,
            runtime: test_runtime()?,
            _database: database,
        })
    }

    /// Creates one task per name, in order, and returns their identifiers.
    pub fn seed<const N: usize>(&self, names: [&str; N]) -> Result<[TaskId; N], BoxError> {
        let ids = names
            .iter()
            .map(|name| {
                let request = CreateTaskRequest::new(*name, "1.00", FAR_DUE_DATE);
                let task = self.runtime.block_on(self.service.create(request))?;
                Ok(task.id())
            })
            .collect::<Result<Vec<_>, BoxError>>()?;
        <[TaskId; N]>::try_from(ids)
            .map_err(|_| boxed(std::io::Error::other("seeded fewer tasks than names")))
    }

    /// Returns `(id, rank)` pairs in list order.
    pub fn ranks(&self) -> Result<Vec<(TaskId, i64)>, BoxError> {
        let list = self.runtime.block_on(self.service.list())?;
        Ok(list
            .tasks()
            .iter()
            .map(|task| (task.id(), task.rank().value()))
            .collect())
    }
}
