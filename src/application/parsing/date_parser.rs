use crate::domain::errors::{ScheduleError, ScheduleResult};
use chrono::{Datelike, NaiveDate};

/// Formats carrying a year, tried in order.
const DATED_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// Month-day formats, completed with the next matching year.
const YEARLESS_FORMATS: &[&str] = &["%B %d", "%b %d", "%d %B", "%d %b"];

/// Parses `yyyy-MM-dd`, `MM/dd/yyyy`, `M/d/yyyy` and long or abbreviated month names
/// ("March 1, 2025", "Mar 1st 2025"). A date without a year resolves to the next
/// such date on or after `today`.
pub fn parse_date(input: &str, today: NaiveDate) -> ScheduleResult<NaiveDate> {
    let cleaned = strip_ordinal_suffixes(input.trim());

    for format in DATED_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Ok(date);
        }
    }

    for format in YEARLESS_FORMATS {
        // Feb 29 needs a leap year, so look a few years ahead
        for year in today.year()..=today.year() + 8 {
            let with_year = format!("{cleaned} {year}");
            if let Ok(date) = NaiveDate::parse_from_str(&with_year, &format!("{format} %Y")) {
                if date >= today {
                    return Ok(date);
                }
            }
        }
    }

    Err(ScheduleError::InvalidDate(input.to_string()))
}

/// "1st" -> "1", "22nd," -> "22,"
fn strip_ordinal_suffixes(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let (body, comma) = match word.strip_suffix(',') {
                Some(body) => (body, ","),
                None => (word, ""),
            };
            let lowered = body.to_lowercase();
            for suffix in ["st", "nd", "rd", "th"] {
                if let Some(number) = lowered.strip_suffix(suffix) {
                    if !number.is_empty() && number.chars().all(|c| c.is_ascii_digit()) {
                        return format!("{number}{comma}");
                    }
                }
            }
            word.to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}
