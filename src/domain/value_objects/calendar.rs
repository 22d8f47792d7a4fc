//! Calendar arithmetic on wall-clock time, resolved against an IANA zone.

use crate::domain::value_objects::recurrence::WeekPosition;
use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

/// Largest forward shift tried when a wall-clock time falls into a DST gap.
const MAX_GAP_SHIFT_MINUTES: i64 = 180;

/// Wall-clock date/time of `instant` in `tz`.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// Resolves a wall-clock time in `tz` to an instant.
///
/// Ambiguous times (clocks turned back) take the earlier instant. Times inside a
/// gap (clocks turned forward) move forward to the first valid minute.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            let mut shifted = naive;
            for _ in 0..MAX_GAP_SHIFT_MINUTES {
                shifted += Duration::minutes(1);
                if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
                    return dt.with_timezone(&Utc);
                }
            }
            tz.from_utc_datetime(&naive).with_timezone(&Utc)
        }
    }
}

/// Combines a calendar date with a clock time in `tz`.
pub fn at_time(date: NaiveDate, time: NaiveTime, tz: Tz) -> DateTime<Utc> {
    resolve_local(date.and_time(time), tz)
}

pub fn add_days(date: NaiveDate, days: u64) -> Option<NaiveDate> {
    date.checked_add_days(Days::new(days))
}

/// Adds whole months, clamping the day to the target month's length (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(naive: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    naive.checked_add_months(Months::new(months))
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map_or(28, |last| last.day())
}

/// Number of whole calendar months from `from` to `to` (negative if `to` is earlier)
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    let from_index = i64::from(from.year()) * 12 + i64::from(from.month0());
    let to_index = i64::from(to.year()) * 12 + i64::from(to.month0());
    to_index - from_index
}

/// First day of the month that is `months` after the month containing `date`.
pub fn first_of_month_after(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.with_day(1)?.checked_add_months(Months::new(months))
}

/// The `position`-th `weekday` of the given month, if the month has one.
pub fn weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    position: WeekPosition,
) -> Option<NaiveDate> {
    match position.index() {
        Some(index) => NaiveDate::from_weekday_of_month_opt(year, month, weekday, index as u8 + 1),
        None => {
            let last = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month))?;
            let back = (7 + last.weekday().num_days_from_monday()
                - weekday.num_days_from_monday())
                % 7;
            last.checked_sub_days(Days::new(u64::from(back)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_addition_clamps_to_month_end() {
        let jan31 = date(2025, 1, 31).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(add_months(jan31, 1).unwrap().date(), date(2025, 2, 28));
        assert_eq!(add_months(jan31, 13).unwrap().date(), date(2026, 2, 28));
        let leap = date(2024, 1, 31).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(add_months(leap, 1).unwrap().date(), date(2024, 2, 29));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(days_in_month(2025, 4), 30);
    }

    #[test]
    fn months_between_spans_years() {
        assert_eq!(months_between(date(2024, 11, 30), date(2025, 2, 1)), 3);
        assert_eq!(months_between(date(2025, 2, 1), date(2024, 11, 30)), -3);
        assert_eq!(months_between(date(2025, 2, 1), date(2025, 2, 28)), 0);
    }

    #[test]
    fn ordinal_weekdays() {
        // January 2025 starts on a Wednesday
        assert_eq!(
            weekday_of_month(2025, 1, Weekday::Tue, WeekPosition::Second),
            Some(date(2025, 1, 14))
        );
        assert_eq!(
            weekday_of_month(2025, 1, Weekday::Fri, WeekPosition::Last),
            Some(date(2025, 1, 31))
        );
        assert_eq!(
            weekday_of_month(2025, 1, Weekday::Wed, WeekPosition::First),
            Some(date(2025, 1, 1))
        );
        assert_eq!(
            weekday_of_month(2025, 2, Weekday::Mon, WeekPosition::Last),
            Some(date(2025, 2, 24))
        );
    }

    #[test]
    fn gap_times_move_forward_and_ambiguous_times_take_the_earlier_instant() {
        let tz: Tz = "America/New_York".parse().unwrap();

        // 2025-03-09 02:30 does not exist in New York
        let gap = date(2025, 3, 9).and_hms_opt(2, 30, 0).unwrap();
        let resolved = resolve_local(gap, tz);
        assert_eq!(to_local(resolved, tz), date(2025, 3, 9).and_hms_opt(3, 0, 0).unwrap());

        // 2025-11-02 01:30 happens twice; EDT (UTC-4) comes first
        let ambiguous = date(2025, 11, 2).and_hms_opt(1, 30, 0).unwrap();
        let resolved = resolve_local(ambiguous, tz);
        assert_eq!(resolved, Utc.with_ymd_and_hms(2025, 11, 2, 5, 30, 0).unwrap());
    }
}
