//! Adapter implementations of the task store port.
//!
//! - [`memory::InMemoryTaskStore`]: thread-safe in-memory storage for tests
//!   and embedding
//! - [`postgres::PostgresTaskStore`]: `PostgreSQL` persistence using Diesel

pub mod memory;
pub mod postgres;
