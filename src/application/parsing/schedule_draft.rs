use crate::application::parsing::date_parser::parse_date;
use crate::application::parsing::recurrence_parser::parse_recurrence_kind;
use crate::application::parsing::time_parser::parse_clock_time;
use crate::domain::entities::schedule::Schedule;
use crate::domain::entities::time_window::TimeWindow;
use crate::domain::errors::{ScheduleError, ScheduleResult};
use crate::domain::value_objects::calendar;
use crate::domain::value_objects::recurrence::{MonthlyRule, Recurrence, WeekPosition};
use crate::domain::value_objects::weekday_format::WeekdayFormat;
use crate::domain::value_objects::weekday_set::WeekdaySet;
use crate::infrastructure::config::EngineConfig;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

const DEFAULT_START_HOUR: u32 = 9;

/// Structured record produced by the natural-language front end.
///
/// Every field is optional; strings are parsed here, not upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub times: Vec<String>,
    pub recurrence: Option<String>,
    pub interval: Option<i64>,
    pub weekdays: Vec<String>,
    pub day_of_month: Option<i64>,
    pub days_of_month: Vec<i64>,
    pub week_position: Option<String>,
    pub position_weekday: Option<String>,
    pub range_start: Option<String>,
    pub range_end: Option<String>,
    pub end_date: Option<String>,
    pub timezone: Option<String>,
}

impl ScheduleDraft {
    pub fn from_json(json: &str) -> ScheduleResult<Self> {
        serde_json::from_str(json).map_err(|e| ScheduleError::InvalidDraft(e.to_string()))
    }

    /// Builds one schedule per requested time of day, or a single schedule when
    /// no list of times is given.
    ///
    /// Dates without a year and a missing date resolve against `now` in the
    /// draft's zone. A one-time draft whose only instant already passed today
    /// moves to tomorrow.
    pub fn into_schedules(
        &self,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Schedule>> {
        let timezone = match self.timezone.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => {
                Tz::from_str(name).map_err(|_| ScheduleError::UnknownTimezone(name.to_string()))?
            }
            _ => config.default_timezone,
        };
        let today = calendar::to_local(now, timezone).date();

        let explicit_date = match self.date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(parse_date(raw, today)?),
            _ => None,
        };
        let anchor_date = explicit_date.unwrap_or(today);

        let recurrence = self.recurrence(anchor_date)?;

        let end_bound = match self.end_date.as_deref() {
            Some(raw) if !raw.trim().is_empty() => {
                let last_day = parse_date(raw, today)?;
                let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
                    .ok_or_else(|| ScheduleError::InvalidTime("23:59:59".to_string()))?;
                Some(calendar::at_time(last_day, end_of_day, timezone))
            }
            _ => None,
        };

        let windows = self.windows(config, timezone)?;
        let mut schedules = Vec::with_capacity(windows.len().max(1));

        if windows.is_empty() {
            let start = NaiveTime::from_hms_opt(DEFAULT_START_HOUR, 0, 0)
                .ok_or_else(|| ScheduleError::InvalidTime(DEFAULT_START_HOUR.to_string()))?;
            let anchor = self.anchor(&recurrence, anchor_date, explicit_date, start, timezone, now);
            schedules.push(self.build(recurrence, anchor, end_bound, timezone, None)?);
        } else {
            for window in windows {
                let anchor = self.anchor(
                    &recurrence,
                    anchor_date,
                    explicit_date,
                    window.start_time(),
                    timezone,
                    now,
                );
                schedules.push(self.build(
                    recurrence.clone(),
                    anchor,
                    end_bound,
                    timezone,
                    Some(window),
                )?);
            }
        }

        debug!(
            "Draft {:?} produced {} schedule(s)",
            self.title.as_deref().unwrap_or_default(),
            schedules.len()
        );
        Ok(schedules)
    }

    fn recurrence(&self, anchor_date: NaiveDate) -> ScheduleResult<Recurrence> {
        let weekdays = if self.weekdays.is_empty() {
            None
        } else {
            Some(WeekdaySet::from_names(&self.weekdays)?)
        };

        let monthly = if let Some(raw) = self.week_position.as_deref() {
            let position = WeekPosition::parse_name(raw)
                .ok_or_else(|| ScheduleError::InvalidDraft(format!("unknown week position {raw:?}")))?;
            let weekday = match self.position_weekday.as_deref() {
                Some(name) => chrono::Weekday::parse_name(name)
                    .ok_or_else(|| ScheduleError::InvalidWeekday(name.to_string()))?,
                None => weekdays
                    .and_then(|set| set.iter().next())
                    .unwrap_or_else(|| anchor_date.weekday()),
            };
            MonthlyRule::Ordinal { position, weekday }
        } else {
            let mut days = self.days_of_month.clone();
            days.extend(self.day_of_month);
            MonthlyRule::days(&days)?
        };

        let name = self.recurrence.as_deref().unwrap_or("once");
        parse_recurrence_kind(name, weekdays, monthly)
    }

    /// One window per entry of `times`, else one for `time`/`rangeStart`, else none
    fn windows(&self, config: &EngineConfig, timezone: Tz) -> ScheduleResult<Vec<TimeWindow>> {
        let starts: Vec<NaiveTime> = if !self.times.is_empty() {
            self.times
                .iter()
                .map(|raw| parse_clock_time(raw))
                .collect::<ScheduleResult<_>>()?
        } else if let Some(raw) = self.time.as_deref().or(self.range_start.as_deref()) {
            vec![parse_clock_time(raw)?]
        } else {
            return Ok(Vec::new());
        };

        // one end time cannot close several windows
        if starts.len() > 1 && self.range_end.is_some() {
            return Err(ScheduleError::InvalidDraft(
                "rangeEnd cannot be combined with several times".to_string(),
            ));
        }
        let range_end = self.range_end.as_deref().map(parse_clock_time).transpose()?;
        let last_minute = NaiveTime::from_hms_opt(23, 59, 59)
            .ok_or_else(|| ScheduleError::InvalidTime("23:59:59".to_string()))?;

        Ok(starts
            .into_iter()
            .map(|start| {
                let end = range_end.unwrap_or_else(|| {
                    let (end, wrapped) =
                        start.overflowing_add_signed(Duration::minutes(config.default_window_minutes));
                    if wrapped != 0 || end < start { last_minute } else { end }
                });
                TimeWindow::new(start, end, timezone)
            })
            .collect())
    }

    fn anchor(
        &self,
        recurrence: &Recurrence,
        anchor_date: NaiveDate,
        explicit_date: Option<NaiveDate>,
        start: NaiveTime,
        timezone: Tz,
        now: DateTime<Utc>,
    ) -> DateTime<Utc> {
        let anchor = calendar::at_time(anchor_date, start, timezone);
        if matches!(recurrence, Recurrence::Once) && explicit_date.is_none() && anchor <= now {
            if let Some(tomorrow) = anchor_date.succ_opt() {
                return calendar::at_time(tomorrow, start, timezone);
            }
        }
        anchor
    }

    fn build(
        &self,
        recurrence: Recurrence,
        anchor: DateTime<Utc>,
        end_bound: Option<DateTime<Utc>>,
        timezone: Tz,
        window: Option<TimeWindow>,
    ) -> ScheduleResult<Schedule> {
        let mut builder = Schedule::builder(recurrence, anchor)
            .interval(self.interval.unwrap_or(1))
            .timezone(timezone);
        if let Some(end) = end_bound {
            builder = builder.end_bound(end);
        }
        if let Some(window) = window {
            builder = builder.time_window(window);
        }
        builder.build()
    }
}
