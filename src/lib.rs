//! Tasklist: a ranked task list with collision-free reordering.
//!
//! Every task carries a unique positive rank that defines display order.
//! Ranks are changed only by the [`task::services::RankSequencer`], which
//! routes every multi-row exchange through negative placeholder ranks so that
//! a per-statement uniqueness constraint never observes two tasks sharing a
//! rank.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: validated values, ranks and write plans
//! - **Ports**: the transactional [`task::ports::TaskStore`] contract
//! - **Adapters**: in-memory and `PostgreSQL` stores
//!
//! # Modules
//!
//! - [`task`]: ranked task management
//! - [`config`]: store settings from the environment
//! - [`telemetry`]: tracing subscriber setup for binaries

pub mod config;
pub mod task;
pub mod telemetry;
