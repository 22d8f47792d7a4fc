use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Errors raised while building or evaluating a schedule.
///
/// Running out of occurrences is not an error: calculators report it as `Ok(None)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Interval must be a positive integer, got {0}")]
    InvalidInterval(i64),

    #[error("End bound {end} precedes anchor {anchor}")]
    EndBeforeAnchor {
        anchor: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid day of month: {0}")]
    InvalidDayOfMonth(i64),

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("Unknown recurrence kind: {0}")]
    UnknownRecurrence(String),

    #[error("Custom recurrence is not supported: {0}")]
    UnsupportedCustom(String),

    #[error("Invalid time window: {}", .0.join("; "))]
    InvalidTimeWindow(Vec<String>),

    #[error("Time window zone {window} differs from schedule zone {schedule}")]
    TimezoneMismatch { window: Tz, schedule: Tz },

    #[error("Malformed schedule draft: {0}")]
    InvalidDraft(String),

    #[error("Schedule not found: {0}")]
    NotFound(u64),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
