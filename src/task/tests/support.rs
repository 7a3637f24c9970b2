//! Shared builders for task unit tests.

use crate::task::domain::{Cost, DueDate, Rank, Task, TaskDetails, TaskId, TaskName};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at noon UTC of a fixed day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).expect("valid time of day");
        Self(Utc.from_utc_datetime(&noon))
    }

    pub fn today(&self) -> NaiveDate {
        self.local().date_naive()
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn task_id(value: i64) -> TaskId {
    TaskId::new(value).expect("valid task id")
}

pub fn rank(value: i64) -> Rank {
    Rank::new(value).expect("valid rank")
}

pub fn details(name: &str) -> TaskDetails {
    TaskDetails::new(
        TaskName::new(name).expect("valid name"),
        Cost::parse("10.00").expect("valid cost"),
        DueDate::parse("2999-12-31").expect("valid date"),
    )
}

pub fn stored_task(id: i64, rank_value: i64) -> Task {
    Task::from_persisted(task_id(id), details(&format!("Task {id}")), rank(rank_value))
}
