use crate::domain::errors::{ScheduleError, ScheduleResult};
use crate::domain::value_objects::recurrence::{MonthlyRule, Recurrence};
use crate::domain::value_objects::weekday_set::WeekdaySet;
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    /// Alternative spellings mapped to canonical kind names
    static ref KIND_ALIASES: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();

        m.insert("none", "once");
        m.insert("one-time", "once");
        m.insert("onetime", "once");
        m.insert("single", "once");
        m.insert("never", "once");

        m.insert("every day", "daily");
        m.insert("everyday", "daily");
        m.insert("day", "daily");

        m.insert("every week", "weekly");
        m.insert("week", "weekly");

        m.insert("fortnightly", "biweekly");
        m.insert("bi-weekly", "biweekly");
        m.insert("every other week", "biweekly");

        m.insert("every month", "monthly");
        m.insert("month", "monthly");

        m.insert("bi-monthly", "bimonthly");
        m.insert("every other month", "bimonthly");

        m.insert("quarter", "quarterly");
        m.insert("every quarter", "quarterly");

        m.insert("semi-annually", "semiannually");
        m.insert("semiannual", "semiannually");
        m.insert("half-yearly", "semiannually");
        m.insert("biannually", "semiannually");

        m.insert("annually", "yearly");
        m.insert("annual", "yearly");
        m.insert("every year", "yearly");
        m.insert("year", "yearly");

        m.insert("weekday", "weekdays");
        m.insert("every weekday", "weekdays");
        m.insert("workdays", "weekdays");

        m.insert("weekend", "weekends");
        m.insert("every weekend", "weekends");

        m
    };
}

/// Builds a [`Recurrence`] from a kind name reported by the upstream parser.
///
/// `weekdays` applies to weekly and weekdays kinds, `monthly` to monthly kinds.
/// Only "custom:<descriptor>" yields `Recurrence::Custom`; any other unrecognized
/// name is rejected.
pub fn parse_recurrence_kind(
    name: &str,
    weekdays: Option<WeekdaySet>,
    monthly: MonthlyRule,
) -> ScheduleResult<Recurrence> {
    let normalized = name.trim().to_lowercase().replace('_', "-");
    if normalized.is_empty() {
        return Err(ScheduleError::UnknownRecurrence(name.to_string()));
    }

    if let Some(descriptor) = normalized.strip_prefix("custom:") {
        return Ok(Recurrence::Custom {
            descriptor: descriptor.trim().to_string(),
        });
    }

    let canonical = KIND_ALIASES
        .get(normalized.as_str())
        .copied()
        .unwrap_or(normalized.as_str());

    let recurrence = match canonical {
        "once" => Recurrence::Once,
        "daily" => Recurrence::Daily,
        "weekly" => Recurrence::Weekly { days: weekdays },
        "monthly" => Recurrence::Monthly { rule: monthly },
        "yearly" => Recurrence::Yearly,
        "weekdays" => Recurrence::Weekdays { days: weekdays },
        "weekends" => Recurrence::Weekends,
        "biweekly" => Recurrence::Biweekly,
        "bimonthly" => Recurrence::Bimonthly,
        "quarterly" => Recurrence::Quarterly,
        "semiannually" => Recurrence::Semiannually,
        _ => return Err(ScheduleError::UnknownRecurrence(name.to_string())),
    };

    Ok(recurrence)
}
