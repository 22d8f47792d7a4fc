use crate::domain::entities::occurrence_cache::OccurrenceCache;
use crate::domain::entities::time_window::TimeWindow;
use crate::domain::errors::ScheduleError;
use crate::domain::value_objects::recurrence::{MonthlyRule, Recurrence, WeekPosition};
use crate::domain::value_objects::weekday_set::WeekdaySet;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// A recurring schedule owned by exactly one task.
///
/// `interval` can never be zero, so every stepping loop advances. The cached
/// occurrence is not part of the schedule's identity and is cleared by every
/// setter that changes what the schedule produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRecord", into = "ScheduleRecord")]
pub struct Schedule {
    recurrence: Recurrence,
    interval: NonZeroU32,
    anchor_start: DateTime<Utc>,
    end_bound: Option<DateTime<Utc>>,
    timezone: Tz,
    active: bool,
    time_window: Option<TimeWindow>,
    cache: OccurrenceCache,
}

/// Serialized form of [`Schedule`], checked on the way in.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleRecord {
    recurrence: Recurrence,
    interval: i64,
    anchor_start: DateTime<Utc>,
    end_bound: Option<DateTime<Utc>>,
    timezone: Tz,
    active: bool,
    time_window: Option<TimeWindow>,
    #[serde(default)]
    cache: OccurrenceCache,
}

impl TryFrom<ScheduleRecord> for Schedule {
    type Error = ScheduleError;

    fn try_from(record: ScheduleRecord) -> Result<Self, Self::Error> {
        let mut schedule = Schedule::builder(record.recurrence, record.anchor_start)
            .interval(record.interval)
            .timezone(record.timezone)
            .build()?;
        schedule.set_end_bound(record.end_bound)?;
        schedule.set_time_window(record.time_window)?;
        schedule.active = record.active;
        schedule.cache = record.cache;
        Ok(schedule)
    }
}

impl From<Schedule> for ScheduleRecord {
    fn from(schedule: Schedule) -> Self {
        ScheduleRecord {
            recurrence: schedule.recurrence,
            interval: i64::from(schedule.interval.get()),
            anchor_start: schedule.anchor_start,
            end_bound: schedule.end_bound,
            timezone: schedule.timezone,
            active: schedule.active,
            time_window: schedule.time_window,
            cache: schedule.cache,
        }
    }
}

/// Windows are painted in their own zone, so it must be the schedule's.
fn check_window_zone(window: Option<&TimeWindow>, timezone: Tz) -> Result<(), ScheduleError> {
    match window {
        Some(window) if window.timezone() != timezone => Err(ScheduleError::TimezoneMismatch {
            window: window.timezone(),
            schedule: timezone,
        }),
        _ => Ok(()),
    }
}

fn checked_interval(interval: i64) -> Result<NonZeroU32, ScheduleError> {
    u32::try_from(interval)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(ScheduleError::InvalidInterval(interval))
}

impl Schedule {
    pub fn builder(recurrence: Recurrence, anchor_start: DateTime<Utc>) -> ScheduleBuilder {
        ScheduleBuilder::new(recurrence, anchor_start)
    }

    pub fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    pub fn interval(&self) -> NonZeroU32 {
        self.interval
    }

    pub fn anchor_start(&self) -> DateTime<Utc> {
        self.anchor_start
    }

    pub fn end_bound(&self) -> Option<DateTime<Utc>> {
        self.end_bound
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn time_window(&self) -> Option<&TimeWindow> {
        self.time_window.as_ref()
    }

    pub fn cache(&self) -> &OccurrenceCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut OccurrenceCache {
        &mut self.cache
    }

    /// Explicit weekday set of Weekly/Weekdays schedules
    pub fn weekday_set(&self) -> Option<WeekdaySet> {
        match &self.recurrence {
            Recurrence::Weekly { days } | Recurrence::Weekdays { days } => *days,
            _ => None,
        }
    }

    pub fn monthly_days(&self) -> Option<&[u32]> {
        match &self.recurrence {
            Recurrence::Monthly {
                rule: MonthlyRule::Days { days },
            } => Some(days),
            _ => None,
        }
    }

    pub fn week_position(&self) -> Option<WeekPosition> {
        match &self.recurrence {
            Recurrence::Monthly {
                rule: MonthlyRule::Ordinal { position, .. },
            } => Some(*position),
            _ => None,
        }
    }

    /// Coarse bounds check: active and within `[anchor_start, end_bound]`.
    /// Does not look at the recurrence pattern.
    pub fn is_valid_for_date(&self, date: DateTime<Utc>) -> bool {
        self.active
            && date >= self.anchor_start
            && self.end_bound.is_none_or(|end| date <= end)
    }

    pub fn disable(&mut self) {
        self.active = false;
    }

    pub fn enable(&mut self) {
        self.active = true;
        self.cache.clear();
    }

    pub fn set_recurrence(&mut self, recurrence: Recurrence) {
        self.recurrence = recurrence;
        self.cache.clear();
    }

    pub fn set_interval(&mut self, interval: i64) -> Result<(), ScheduleError> {
        self.interval = checked_interval(interval)?;
        self.cache.clear();
        Ok(())
    }

    pub fn set_time_window(&mut self, time_window: Option<TimeWindow>) -> Result<(), ScheduleError> {
        check_window_zone(time_window.as_ref(), self.timezone)?;
        self.time_window = time_window;
        self.cache.clear();
        Ok(())
    }

    pub fn set_end_bound(&mut self, end_bound: Option<DateTime<Utc>>) -> Result<(), ScheduleError> {
        if let Some(end) = end_bound {
            if end < self.anchor_start {
                return Err(ScheduleError::EndBeforeAnchor {
                    anchor: self.anchor_start,
                    end,
                });
            }
        }
        self.end_bound = end_bound;
        self.cache.clear();
        Ok(())
    }

    /// Human readable summary, e.g. "every 2 weeks (weekly)"
    pub fn describe(&self) -> String {
        let every = match self.interval.get() {
            1 => String::new(),
            n => format!("every {n}x "),
        };
        let window = self
            .time_window
            .as_ref()
            .map(|w| format!(" at {}", w.start_time().format("%H:%M")))
            .unwrap_or_default();
        format!("{every}{}{window} ({})", self.recurrence, self.timezone)
    }
}

/// Builds a [`Schedule`], rejecting configurations that could loop or misfire.
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    recurrence: Recurrence,
    anchor_start: DateTime<Utc>,
    interval: i64,
    end_bound: Option<DateTime<Utc>>,
    timezone: Tz,
    time_window: Option<TimeWindow>,
    active: bool,
}

impl ScheduleBuilder {
    pub fn new(recurrence: Recurrence, anchor_start: DateTime<Utc>) -> Self {
        Self {
            recurrence,
            anchor_start,
            interval: 1,
            end_bound: None,
            timezone: Tz::UTC,
            time_window: None,
            active: true,
        }
    }

    pub fn interval(mut self, interval: i64) -> Self {
        self.interval = interval;
        self
    }

    pub fn end_bound(mut self, end_bound: DateTime<Utc>) -> Self {
        self.end_bound = Some(end_bound);
        self
    }

    pub fn timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = Some(time_window);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn build(self) -> Result<Schedule, ScheduleError> {
        let interval = checked_interval(self.interval)?;
        check_window_zone(self.time_window.as_ref(), self.timezone)?;

        if let Some(end) = self.end_bound {
            if end < self.anchor_start {
                return Err(ScheduleError::EndBeforeAnchor {
                    anchor: self.anchor_start,
                    end,
                });
            }
        }

        Ok(Schedule {
            recurrence: self.recurrence,
            interval,
            anchor_start: self.anchor_start,
            end_bound: self.end_bound,
            timezone: self.timezone,
            active: self.active,
            time_window: self.time_window,
            cache: OccurrenceCache::default(),
        })
    }
}
