//! Validated descriptive fields of a task.

use super::TaskDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trimmed, non-empty task name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskName(String);

impl TaskName {
    /// Largest name accepted by the persisted schema, in characters.
    pub const MAX_LENGTH: usize = 255;

    /// Creates a validated task name.
    ///
    /// Surrounding whitespace is removed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTaskName`] for blank input or
    /// [`TaskDomainError::TaskNameTooLong`] when the trimmed name exceeds
    /// [`Self::MAX_LENGTH`] characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTaskName);
        }
        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskDomainError::TaskNameTooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskName {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskName> for String {
    fn from(name: TaskName) -> Self {
        name.0
    }
}

impl AsRef<str> for TaskName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-negative monetary amount held as whole cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cost(u64);

impl Cost {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    const CENTS_PER_UNIT: u64 = 100;
    const MAX_CENTS: u64 = i64::MAX.unsigned_abs();

    /// Creates a cost from whole cents.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CostOverflow`] when the amount exceeds the
    /// persisted range.
    pub const fn from_cents(cents: u64) -> Result<Self, TaskDomainError> {
        if cents > Self::MAX_CENTS {
            return Err(TaskDomainError::CostOverflow);
        }
        Ok(Self(cents))
    }

    /// Parses a decimal amount such as `12`, `12.5`, `12.50` or `12,50`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidCost`] for negative, empty, or
    /// malformed input and for more than two fractional digits.
    pub fn parse(raw: &str) -> Result<Self, TaskDomainError> {
        let invalid = || TaskDomainError::InvalidCost(raw.to_owned());
        let normalized = raw.trim().replace(',', ".");
        let (whole, fraction) = normalized
            .split_once('.')
            .unwrap_or((normalized.as_str(), ""));
        let has_separator = normalized.contains('.');

        if whole.is_empty() || !is_ascii_digits(whole) || !is_ascii_digits(fraction) {
            return Err(invalid());
        }
        if has_separator && fraction.is_empty() {
            return Err(invalid());
        }

        let units = whole.parse::<u64>().map_err(|_| invalid())?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            2 => fraction.parse::<u64>().map_err(|_| invalid())?,
            _ => return Err(invalid()),
        };

        units
            .checked_mul(Self::CENTS_PER_UNIT)
            .and_then(|cents| cents.checked_add(fraction_cents))
            .ok_or(TaskDomainError::CostOverflow)
            .and_then(Self::from_cents)
    }

    /// Returns the amount in whole cents.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CostOverflow`] when the sum exceeds the
    /// persisted range.
    pub fn checked_add(self, other: Self) -> Result<Self, TaskDomainError> {
        let sum = self
            .0
            .checked_add(other.0)
            .ok_or(TaskDomainError::CostOverflow)?;
        Self::from_cents(sum)
    }
}

fn is_ascii_digits(value: &str) -> bool {
    value.chars().all(|ch| ch.is_ascii_digit())
}

impl TryFrom<String> for Cost {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Cost> for String {
    fn from(cost: Cost) -> Self {
        cost.to_string()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let units = self.0.div_euclid(Self::CENTS_PER_UNIT);
        let cents = self.0.rem_euclid(Self::CENTS_PER_UNIT);
        write!(f, "{units}.{cents:02}")
    }
}

/// Calendar date by which a task should be finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DueDate(NaiveDate);

impl DueDate {
    const FORMAT: &'static str = "%Y-%m-%d";

    /// Wraps an already validated calendar date.
    #[must_use]
    pub const fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parses a strict `YYYY-MM-DD` date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidDueDate`] when the text does not
    /// follow the format or names a day that does not exist.
    pub fn parse(raw: &str) -> Result<Self, TaskDomainError> {
        let candidate = raw.trim();
        if !has_iso_date_shape(candidate) {
            return Err(TaskDomainError::InvalidDueDate(raw.to_owned()));
        }
        NaiveDate::parse_from_str(candidate, Self::FORMAT)
            .map(Self)
            .map_err(|_| TaskDomainError::InvalidDueDate(raw.to_owned()))
    }

    /// Rejects dates before `today`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::DueDateInPast`] when the date is earlier
    /// than `today`.
    pub fn ensure_not_before(self, today: NaiveDate) -> Result<Self, TaskDomainError> {
        if self.0 < today {
            return Err(TaskDomainError::DueDateInPast {
                due_date: self.0,
                today,
            });
        }
        Ok(self)
    }

    /// Returns the wrapped date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

/// Checks for exactly four, two and two ASCII digits separated by hyphens.
fn has_iso_date_shape(value: &str) -> bool {
    value.len() == 10
        && value.char_indices().all(|(index, ch)| match index {
            4 | 7 => ch == '-',
            _ => ch.is_ascii_digit(),
        })
}

impl fmt::Display for DueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}
