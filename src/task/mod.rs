//! Ranked task list management.
//!
//! Tasks carry a name, a cost and a due date, and hold a unique rank that
//! defines their position in the list. Ranks are mutated by three protocols:
//! initial assignment on insert, adjacent swap, and full reorder. Each one
//! runs inside a single store transaction and never lets two tasks share a
//! rank. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
