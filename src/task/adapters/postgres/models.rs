//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::NaiveDate;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: i64,
    /// Task name.
    pub name: String,
    /// Cost in whole cents.
    pub cost_cents: i64,
    /// Due date.
    pub due_date: NaiveDate,
    /// Rank column value.
    pub rank: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    /// Task name.
    pub name: &'a str,
    /// Cost in whole cents.
    pub cost_cents: i64,
    /// Due date.
    pub due_date: NaiveDate,
    /// Initial rank.
    pub rank: i64,
}

/// Changeset replacing the descriptive fields of a task.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskDetailsChangeset<'a> {
    /// Task name.
    pub name: &'a str,
    /// Cost in whole cents.
    pub cost_cents: i64,
    /// Due date.
    pub due_date: NaiveDate,
}
