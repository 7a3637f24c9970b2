//! `PostgreSQL` adapter for ranked task persistence.

mod models;
mod schema;
mod store;

pub use store::{PostgresTaskStore, TaskPgPool, apply_schema};
