use crate::domain::errors::{ScheduleError, ScheduleResult};
use chrono::NaiveTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parses a clock time such as "9am", "9 am", "9:30 AM", "09:00", "17:30", "noon" or "midnight".
pub fn parse_clock_time(input: &str) -> ScheduleResult<NaiveTime> {
    let invalid = || ScheduleError::InvalidTime(input.to_string());

    // drop spaces and the dots of "a.m."
    let normalized: String = input
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    match normalized.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0).ok_or_else(invalid),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0).ok_or_else(invalid),
        _ => {}
    }

    let (clock, meridiem) = if let Some(rest) = normalized.strip_suffix("am") {
        (rest, Some(Meridiem::Am))
    } else if let Some(rest) = normalized.strip_suffix("pm") {
        (rest, Some(Meridiem::Pm))
    } else {
        (normalized.as_str(), None)
    };

    let (hour_str, minute_str) = clock.split_once(':').unwrap_or((clock, "00"));
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(hour_str) || hour_str.len() > 2 || !all_digits(minute_str) || minute_str.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    let minute: u32 = minute_str.parse().map_err(|_| invalid())?;

    let hour = match meridiem {
        Some(_) if hour == 0 || hour > 12 => return Err(invalid()),
        Some(Meridiem::Am) => hour % 12,
        Some(Meridiem::Pm) => hour % 12 + 12,
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn accepts_meridiem_forms() {
        assert_eq!(parse_clock_time("9am"), Ok(hm(9, 0)));
        assert_eq!(parse_clock_time("9 am"), Ok(hm(9, 0)));
        assert_eq!(parse_clock_time("9:30 AM"), Ok(hm(9, 30)));
        assert_eq!(parse_clock_time("9:30pm"), Ok(hm(21, 30)));
        assert_eq!(parse_clock_time("09:15 p.m."), Ok(hm(21, 15)));
        assert_eq!(parse_clock_time("12pm"), Ok(hm(12, 0)));
        assert_eq!(parse_clock_time("12am"), Ok(hm(0, 0)));
    }

    #[test]
    fn accepts_24_hour_forms() {
        assert_eq!(parse_clock_time("09:00"), Ok(hm(9, 0)));
        assert_eq!(parse_clock_time("9:00"), Ok(hm(9, 0)));
        assert_eq!(parse_clock_time("17:30"), Ok(hm(17, 30)));
        assert_eq!(parse_clock_time("0:05"), Ok(hm(0, 5)));
        assert_eq!(parse_clock_time("Noon"), Ok(hm(12, 0)));
        assert_eq!(parse_clock_time("midnight"), Ok(hm(0, 0)));
    }

    #[test]
    fn rejects_malformed_times() {
        for input in ["", "25:00", "13pm", "0am", "9:7", "9:60", "nine", "9:30:00", "-1:00", "17h30"] {
            assert_eq!(
                parse_clock_time(input),
                Err(ScheduleError::InvalidTime(input.to_string())),
                "{input}"
            );
        }
    }
}
