use crate::domain::entities::schedule::Schedule;
use crate::domain::errors::{ScheduleError, ScheduleResult};
use crate::domain::value_objects::calendar;
use crate::domain::value_objects::recurrence::{MonthlyRule, Recurrence, StepUnit, WeekPosition};
use crate::domain::value_objects::weekday_format::WeekdayFormat;
use crate::infrastructure::config::EngineConfig;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime, Utc, Weekday};
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_WEEKDAY_SCAN_DAYS: u32 = 14;

/// Stepped months inspected before a day-of-month rule gives up (e.g. "the 30th" of every February).
const MAX_MONTH_SCAN: u64 = 120;

/// Extension point for `Recurrence::Custom` descriptors.
pub trait CustomRule: Send + Sync + Debug {
    /// First occurrence strictly after `reference`, or `None` when exhausted
    fn next_after(&self, schedule: &Schedule, reference: DateTime<Utc>) -> Option<DateTime<Utc>>;
}

/// Computes the next occurrence of a schedule. Pure: never touches the schedule's cache.
#[derive(Debug, Clone)]
pub struct OccurrenceCalculator {
    weekday_scan_days: u32,
    custom_rules: HashMap<String, Arc<dyn CustomRule>>,
}

impl Default for OccurrenceCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_WEEKDAY_SCAN_DAYS)
    }
}

/// Next occurrence using the default calculator (no custom rules registered).
pub fn compute_next(
    schedule: &Schedule,
    reference: DateTime<Utc>,
) -> ScheduleResult<Option<DateTime<Utc>>> {
    OccurrenceCalculator::default().compute_next(schedule, reference)
}

impl OccurrenceCalculator {
    pub fn new(weekday_scan_days: u32) -> Self {
        Self {
            weekday_scan_days: weekday_scan_days.max(7),
            custom_rules: HashMap::new(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.weekday_scan_days)
    }

    /// Registers the rule evaluated for `Recurrence::Custom { descriptor }`
    pub fn with_custom_rule(
        mut self,
        descriptor: impl Into<String>,
        rule: Arc<dyn CustomRule>,
    ) -> Self {
        self.custom_rules.insert(descriptor.into(), rule);
        self
    }

    /// First occurrence strictly after `reference`.
    ///
    /// `Ok(None)` means the schedule is exhausted: past its end bound, a `Once`
    /// schedule already fired, or a bounded scan found nothing.
    pub fn compute_next(
        &self,
        schedule: &Schedule,
        reference: DateTime<Utc>,
    ) -> ScheduleResult<Option<DateTime<Utc>>> {
        let candidate = match schedule.recurrence() {
            Recurrence::Once => {
                let anchor = schedule.anchor_start();
                (anchor > reference).then_some(anchor)
            }
            Recurrence::Weekly { days: Some(days) } | Recurrence::Weekdays { days: Some(days) } => {
                let days = *days;
                self.scan_weekdays(schedule, reference, true, |day| days.contains(day))
            }
            Recurrence::Weekdays { days: None } => {
                self.scan_weekdays(schedule, reference, false, |day| day.is_workday())
            }
            Recurrence::Weekends => {
                self.scan_weekdays(schedule, reference, false, |day| day.is_weekend())
            }
            Recurrence::Monthly {
                rule: MonthlyRule::Days { days },
            } => self.scan_months(schedule, reference, |year, month| {
                days.iter()
                    .filter(|&&day| day <= calendar::days_in_month(year, month))
                    .filter_map(|&day| NaiveDate::from_ymd_opt(year, month, day))
                    .collect()
            }),
            Recurrence::Monthly {
                rule: MonthlyRule::Ordinal { position, weekday },
            } => {
                let (position, weekday) = (*position, *weekday);
                self.scan_months(schedule, reference, |year, month| {
                    ordinal_dates(year, month, weekday, position)
                })
            }
            Recurrence::Custom { descriptor } => {
                self.next_custom(schedule, reference, descriptor)?
            }
            recurrence => match recurrence.step_unit() {
                Some(unit) => self.step_from_anchor(schedule, reference, unit),
                None => None,
            },
        };

        let bounded = match (candidate, schedule.end_bound()) {
            (Some(next), Some(end)) if next > end => {
                debug!(%next, %end, "Schedule exhausted by its end bound");
                None
            }
            (candidate, _) => candidate,
        };

        debug!(
            kind = schedule.recurrence().kind_name(),
            %reference,
            next = ?bounded,
            "Computed next occurrence"
        );
        Ok(bounded)
    }

    /// Clock time painted onto a stepped or scanned date: the window start if present,
    /// otherwise the anchor's wall-clock time in the schedule's zone.
    fn paint_date(&self, schedule: &Schedule, date: NaiveDate) -> DateTime<Utc> {
        match schedule.time_window() {
            Some(window) => window.apply_to_date(date),
            None => {
                let tz = schedule.timezone();
                let anchor_time = calendar::to_local(schedule.anchor_start(), tz).time();
                calendar::at_time(date, anchor_time, tz)
            }
        }
    }

    fn scan_weekdays<F>(
        &self,
        schedule: &Schedule,
        reference: DateTime<Utc>,
        include_today: bool,
        matches: F,
    ) -> Option<DateTime<Utc>>
    where
        F: Fn(Weekday) -> bool,
    {
        // a schedule that has not started yet scans from its anchor's date, inclusive
        let anchor = schedule.anchor_start();
        let (from, first_offset) = if anchor > reference {
            (anchor, 0)
        } else {
            (reference, if include_today { 0 } else { 1 })
        };
        let today = calendar::to_local(from, schedule.timezone()).date();

        for offset in first_offset..=u64::from(self.weekday_scan_days) {
            let date = calendar::add_days(today, offset)?;
            if !matches(date.weekday()) {
                continue;
            }
            let candidate = self.paint_date(schedule, date);
            if candidate > reference && candidate >= anchor {
                return Some(candidate);
            }
        }

        warn!(
            %reference,
            scan_days = self.weekday_scan_days,
            "No matching weekday found within the scan bound"
        );
        None
    }

    fn step_from_anchor(
        &self,
        schedule: &Schedule,
        reference: DateTime<Utc>,
        unit: StepUnit,
    ) -> Option<DateTime<Utc>> {
        let tz = schedule.timezone();
        let anchor = schedule.anchor_start();
        let anchor_local = calendar::to_local(anchor, tz);
        let reference_local = calendar::to_local(reference, tz);
        let interval = u64::from(schedule.interval().get());

        let mut index = first_step_index(anchor_local, reference_local, unit, interval);
        loop {
            let stepped = step_at(anchor_local, unit, interval, index)?;
            let candidate = match schedule.time_window() {
                Some(window) => window.apply_to_date(stepped.date()),
                None => calendar::resolve_local(stepped, tz),
            };
            // a window earlier than the anchor's clock time skips the anchor's own day
            if candidate > reference && candidate >= anchor {
                return Some(candidate);
            }
            index += 1;
        }
    }

    fn scan_months<F>(
        &self,
        schedule: &Schedule,
        reference: DateTime<Utc>,
        dates_in_month: F,
    ) -> Option<DateTime<Utc>>
    where
        F: Fn(i32, u32) -> Vec<NaiveDate>,
    {
        let tz = schedule.timezone();
        let anchor = schedule.anchor_start();
        let anchor_date = calendar::to_local(anchor, tz).date();
        let reference_date = calendar::to_local(reference, tz).date();
        let interval = u64::from(schedule.interval().get());

        let skipped = calendar::months_between(anchor_date, reference_date).max(0) as u64;
        let first_index = (skipped / interval).saturating_sub(1);

        for index in first_index..first_index + MAX_MONTH_SCAN {
            let months = u32::try_from(index * interval).ok()?;
            let first = calendar::first_of_month_after(anchor_date, months)?;
            for date in dates_in_month(first.year(), first.month()) {
                let candidate = self.paint_date(schedule, date);
                if candidate >= anchor && candidate > reference {
                    return Some(candidate);
                }
            }
        }

        warn!(%reference, "No matching day of month found within the scan bound");
        None
    }

    fn next_custom(
        &self,
        schedule: &Schedule,
        reference: DateTime<Utc>,
        descriptor: &str,
    ) -> ScheduleResult<Option<DateTime<Utc>>> {
        let rule = self
            .custom_rules
            .get(descriptor)
            .ok_or_else(|| ScheduleError::UnsupportedCustom(descriptor.to_string()))?;

        match rule.next_after(schedule, reference) {
            Some(next) if next <= reference => {
                warn!(descriptor, %next, %reference, "Custom rule returned a non-future occurrence");
                Ok(None)
            }
            next => Ok(next),
        }
    }
}

fn ordinal_dates(year: i32, month: u32, weekday: Weekday, position: WeekPosition) -> Vec<NaiveDate> {
    calendar::weekday_of_month(year, month, weekday, position)
        .into_iter()
        .collect()
}

/// A step index safely before the first occurrence after `reference`, so long-running
/// schedules do not replay every step since the anchor.
fn first_step_index(
    anchor: NaiveDateTime,
    reference: NaiveDateTime,
    unit: StepUnit,
    interval: u64,
) -> u64 {
    if reference <= anchor {
        return 0;
    }
    let (elapsed, step) = match unit {
        StepUnit::Days(days) => (
            (reference - anchor).num_days().max(0) as u64,
            u64::from(days) * interval,
        ),
        StepUnit::Months(months) => (
            calendar::months_between(anchor.date(), reference.date()).max(0) as u64,
            u64::from(months) * interval,
        ),
    };
    (elapsed / step).saturating_sub(2)
}

fn step_at(anchor: NaiveDateTime, unit: StepUnit, interval: u64, index: u64) -> Option<NaiveDateTime> {
    match unit {
        StepUnit::Days(days) => {
            anchor.checked_add_days(Days::new(u64::from(days).checked_mul(interval)?.checked_mul(index)?))
        }
        StepUnit::Months(months) => {
            let total = u64::from(months).checked_mul(interval)?.checked_mul(index)?;
            calendar::add_months(anchor, u32::try_from(total).ok()?)
        }
    }
}
