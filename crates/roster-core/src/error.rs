use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("store error: {0}")]
    Store(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(u64),

    #[error("group not found: {0}")]
    GroupNotFound(u64),

    #[error("no calendar day for employee {employee_id} on {date}")]
    CalendarDayNotFound { employee_id: u64, date: NaiveDate },

    #[error("day {date} of employee {employee_id} is not a labor day")]
    NotLaborDay { employee_id: u64, date: NaiveDate },

    #[error("invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("invalid classification: {0}")]
    InvalidClassification(String),

    #[error("invalid shift: {0}")]
    InvalidShift(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;

/// Wrap any backend error into [`RosterError::Store`].
pub(crate) fn store_err(e: impl std::fmt::Display) -> RosterError {
    RosterError::Store(e.to_string())
}
