use crate::domain::errors::ScheduleError;
use crate::domain::value_objects::calendar;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

const MIN_DURATION_MINUTES: i64 = 1;
const MAX_DURATION_HOURS: i64 = 24;

/// A clock-time interval inside one day, in a given zone.
///
/// Construction never fails: constraint violations are recorded on the value and
/// exposed through [`TimeWindow::is_valid`] and [`TimeWindow::errors`]. Use
/// [`TimeWindow::strict`] to reject them instead. Windows that cross midnight
/// (22:00-02:00) are not representable and are reported as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTimeWindow", into = "RawTimeWindow")]
pub struct TimeWindow {
    start_time: NaiveTime,
    end_time: NaiveTime,
    timezone: Tz,
    is_valid: bool,
    errors: Vec<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeWindow {
    start_time: NaiveTime,
    end_time: NaiveTime,
    timezone: Tz,
}

impl From<RawTimeWindow> for TimeWindow {
    fn from(raw: RawTimeWindow) -> Self {
        TimeWindow::new(raw.start_time, raw.end_time, raw.timezone)
    }
}

impl From<TimeWindow> for RawTimeWindow {
    fn from(window: TimeWindow) -> Self {
        RawTimeWindow {
            start_time: window.start_time,
            end_time: window.end_time,
            timezone: window.timezone,
        }
    }
}

impl TimeWindow {
    pub fn new(start_time: NaiveTime, end_time: NaiveTime, timezone: Tz) -> Self {
        let mut window = Self {
            start_time,
            end_time,
            timezone,
            is_valid: true,
            errors: Vec::new(),
        };
        window.revalidate();
        window
    }

    /// Like [`TimeWindow::new`] but returns the validation errors instead of recording them.
    pub fn strict(
        start_time: NaiveTime,
        end_time: NaiveTime,
        timezone: Tz,
    ) -> Result<Self, ScheduleError> {
        let window = Self::new(start_time, end_time, timezone);
        if window.is_valid {
            Ok(window)
        } else {
            Err(ScheduleError::InvalidTimeWindow(window.errors))
        }
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start_time
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end_time
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn set_start_time(&mut self, start_time: NaiveTime) {
        self.start_time = start_time;
        self.revalidate();
    }

    pub fn set_end_time(&mut self, end_time: NaiveTime) {
        self.end_time = end_time;
        self.revalidate();
    }

    /// Checks the window's constraints without modifying it
    pub fn validate(&self) -> (bool, Vec<String>) {
        let mut errors = Vec::new();

        if self.start_time >= self.end_time {
            errors.push(format!(
                "start must precede end ({} >= {})",
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M")
            ));
        } else {
            let duration = self.duration();
            if duration < Duration::minutes(MIN_DURATION_MINUTES) {
                errors.push("duration must be at least 1 minute".to_string());
            }
            if duration > Duration::hours(MAX_DURATION_HOURS) {
                errors.push("duration must not exceed 24 hours".to_string());
            }
        }

        (errors.is_empty(), errors)
    }

    fn revalidate(&mut self) {
        let (is_valid, errors) = self.validate();
        if !is_valid {
            warn!(
                start = %self.start_time,
                end = %self.end_time,
                "Time window is invalid: {}",
                errors.join("; ")
            );
        }
        self.is_valid = is_valid;
        self.errors = errors;
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn duration_in_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn duration_in_hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }

    /// Whether a clock time falls inside the window, comparing hour and minute only
    pub fn contains(&self, time: NaiveTime) -> bool {
        let minute_of_day = |t: NaiveTime| t.hour() * 60 + t.minute();
        let value = minute_of_day(time);
        minute_of_day(self.start_time) <= value && value <= minute_of_day(self.end_time)
    }

    /// Whether an instant's clock time, read in the window's zone, falls inside the window
    pub fn contains_instant(&self, instant: DateTime<Utc>) -> bool {
        self.contains(calendar::to_local(instant, self.timezone).time())
    }

    /// Whether two windows share any clock time. Both are read as wall-clock times.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start_time < other.end_time && other.start_time < self.end_time
    }

    /// Takes the calendar date of `date` (in the window's zone) and the window's start time
    pub fn apply_time_of_day(&self, date: DateTime<Utc>) -> DateTime<Utc> {
        self.apply_to_date(calendar::to_local(date, self.timezone).date())
    }

    pub fn apply_to_date(&self, date: NaiveDate) -> DateTime<Utc> {
        calendar::at_time(date, self.start_time, self.timezone)
    }
}
