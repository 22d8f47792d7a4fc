use crate::domain::errors::ScheduleError;
use crate::domain::value_objects::weekday_format::WeekdayFormat;
use crate::domain::value_objects::weekday_set::WeekdaySet;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal position of a weekday inside a month ("second Tuesday", "last Friday").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekPosition {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl WeekPosition {
    /// Zero-based week index for the fixed positions, `None` for `Last`
    pub fn index(&self) -> Option<u32> {
        match self {
            WeekPosition::First => Some(0),
            WeekPosition::Second => Some(1),
            WeekPosition::Third => Some(2),
            WeekPosition::Fourth => Some(3),
            WeekPosition::Last => None,
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" | "1st" => Some(WeekPosition::First),
            "second" | "2nd" => Some(WeekPosition::Second),
            "third" | "3rd" => Some(WeekPosition::Third),
            "fourth" | "4th" => Some(WeekPosition::Fourth),
            "last" => Some(WeekPosition::Last),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            WeekPosition::First => "first",
            WeekPosition::Second => "second",
            WeekPosition::Third => "third",
            WeekPosition::Fourth => "fourth",
            WeekPosition::Last => "last",
        }
    }
}

/// Which days of a stepped month fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MonthlyRule {
    /// Same day of month as the anchor, clamped to the month's length.
    AnchorDay,
    /// Explicit days of month; days a month does not have are skipped.
    Days { days: Vec<u32> },
    Ordinal {
        position: WeekPosition,
        weekday: Weekday,
    },
}

impl MonthlyRule {
    /// Validates and normalizes explicit days of month (sorted, deduplicated, 1..=31)
    pub fn days(days: &[i64]) -> Result<Self, ScheduleError> {
        if days.is_empty() {
            return Ok(MonthlyRule::AnchorDay);
        }

        let mut normalized = Vec::with_capacity(days.len());
        for &day in days {
            if !(1..=31).contains(&day) {
                return Err(ScheduleError::InvalidDayOfMonth(day));
            }
            normalized.push(day as u32);
        }
        normalized.sort_unstable();
        normalized.dedup();

        Ok(MonthlyRule::Days { days: normalized })
    }
}

/// How a schedule repeats, with the parameters each kind accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Recurrence {
    Once,
    Daily,
    /// `days: None` steps from the anchor, `Some(set)` fires on those weekdays.
    Weekly { days: Option<WeekdaySet> },
    Monthly { rule: MonthlyRule },
    Yearly,
    /// `days: None` means Monday through Friday.
    Weekdays { days: Option<WeekdaySet> },
    Weekends,
    Biweekly,
    Bimonthly,
    Quarterly,
    Semiannually,
    Custom { descriptor: String },
}

/// Base calendar unit a periodic recurrence steps by, before the interval multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUnit {
    Days(u32),
    Months(u32),
}

impl Recurrence {
    pub fn weekly() -> Self {
        Recurrence::Weekly { days: None }
    }

    pub fn weekly_on(days: WeekdaySet) -> Self {
        Recurrence::Weekly { days: Some(days) }
    }

    pub fn monthly() -> Self {
        Recurrence::Monthly {
            rule: MonthlyRule::AnchorDay,
        }
    }

    pub fn weekdays() -> Self {
        Recurrence::Weekdays { days: None }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Recurrence::Once => "once",
            Recurrence::Daily => "daily",
            Recurrence::Weekly { .. } => "weekly",
            Recurrence::Monthly { .. } => "monthly",
            Recurrence::Yearly => "yearly",
            Recurrence::Weekdays { .. } => "weekdays",
            Recurrence::Weekends => "weekends",
            Recurrence::Biweekly => "biweekly",
            Recurrence::Bimonthly => "bimonthly",
            Recurrence::Quarterly => "quarterly",
            Recurrence::Semiannually => "semiannually",
            Recurrence::Custom { .. } => "custom",
        }
    }

    /// Unit used by anchor stepping. Biweekly deliberately steps one week, like Weekly.
    pub fn step_unit(&self) -> Option<StepUnit> {
        match self {
            Recurrence::Daily => Some(StepUnit::Days(1)),
            Recurrence::Weekly { days: None } | Recurrence::Biweekly => Some(StepUnit::Days(7)),
            Recurrence::Monthly { .. } => Some(StepUnit::Months(1)),
            Recurrence::Bimonthly => Some(StepUnit::Months(2)),
            Recurrence::Quarterly => Some(StepUnit::Months(3)),
            Recurrence::Semiannually => Some(StepUnit::Months(6)),
            Recurrence::Yearly => Some(StepUnit::Months(12)),
            _ => None,
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Recurrence::Weekly { days: Some(days) } => write!(f, "weekly on {days}"),
            Recurrence::Weekdays { days: Some(days) } => write!(f, "weekdays ({days})"),
            Recurrence::Monthly {
                rule: MonthlyRule::Days { days },
            } => {
                let days = days
                    .iter()
                    .map(|d| d.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "monthly on day {days}")
            }
            Recurrence::Monthly {
                rule: MonthlyRule::Ordinal { position, weekday },
            } => write!(f, "monthly on the {} {}", position.as_str(), weekday.to_short_en()),
            Recurrence::Custom { descriptor } => write!(f, "custom ({descriptor})"),
            other => f.write_str(other.kind_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biweekly_steps_like_weekly() {
        assert_eq!(Recurrence::Biweekly.step_unit(), Some(StepUnit::Days(7)));
        assert_eq!(Recurrence::weekly().step_unit(), Some(StepUnit::Days(7)));
    }

    #[test]
    fn month_multipliers() {
        assert_eq!(Recurrence::Bimonthly.step_unit(), Some(StepUnit::Months(2)));
        assert_eq!(Recurrence::Quarterly.step_unit(), Some(StepUnit::Months(3)));
        assert_eq!(Recurrence::Semiannually.step_unit(), Some(StepUnit::Months(6)));
        assert_eq!(Recurrence::Yearly.step_unit(), Some(StepUnit::Months(12)));
    }

    #[test]
    fn weekday_driven_kinds_do_not_step() {
        let days = WeekdaySet::from_names(&["mon"]).unwrap();
        assert_eq!(Recurrence::weekly_on(days).step_unit(), None);
        assert_eq!(Recurrence::Weekends.step_unit(), None);
        assert_eq!(Recurrence::Once.step_unit(), None);
    }

    #[test]
    fn monthly_days_are_validated_and_normalized() {
        assert_eq!(
            MonthlyRule::days(&[15, 1, 15]),
            Ok(MonthlyRule::Days { days: vec![1, 15] })
        );
        assert_eq!(MonthlyRule::days(&[]), Ok(MonthlyRule::AnchorDay));
        assert_eq!(
            MonthlyRule::days(&[32]),
            Err(ScheduleError::InvalidDayOfMonth(32))
        );
        assert_eq!(
            MonthlyRule::days(&[0]),
            Err(ScheduleError::InvalidDayOfMonth(0))
        );
    }

    #[test]
    fn serializes_with_kind_tag() {
        let recurrence = Recurrence::weekly_on(WeekdaySet::from_names(&["mon", "fri"]).unwrap());
        let json = serde_json::to_value(&recurrence).unwrap();
        assert_eq!(json["kind"], "weekly");
        assert_eq!(json["days"], serde_json::json!([2, 6]));

        let back: Recurrence = serde_json::from_value(json).unwrap();
        assert_eq!(back, recurrence);
    }

    #[test]
    fn describes_itself() {
        let ordinal = Recurrence::Monthly {
            rule: MonthlyRule::Ordinal {
                position: WeekPosition::Second,
                weekday: Weekday::Tue,
            },
        };
        assert_eq!(ordinal.to_string(), "monthly on the second Tue");
        assert_eq!(Recurrence::Quarterly.to_string(), "quarterly");
    }
}
