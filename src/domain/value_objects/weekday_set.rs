use crate::domain::errors::ScheduleError;
use crate::domain::value_objects::weekday_format::WeekdayFormat;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A set of 0 to 7 unique weekdays, serialized as Sunday-first ordinals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    fn bit(day: Weekday) -> u8 {
        1 << (day.ordinal() - 1)
    }

    pub fn insert(&mut self, day: Weekday) -> bool {
        let was_present = self.contains(day);
        self.0 |= Self::bit(day);
        !was_present
    }

    pub fn remove(&mut self, day: Weekday) -> bool {
        let was_present = self.contains(day);
        self.0 &= !Self::bit(day);
        was_present
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in Sunday-first order
    pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
        (1..=7u8)
            .filter_map(Weekday::from_ordinal)
            .filter(|day| self.contains(*day))
    }

    /// Builds a set from Sunday-first ordinals, rejecting anything outside 1..=7
    pub fn from_ordinals(ordinals: &[u8]) -> Result<Self, ScheduleError> {
        let mut set = Self::new();
        for &ordinal in ordinals {
            let day = Weekday::from_ordinal(ordinal)
                .ok_or_else(|| ScheduleError::InvalidWeekday(ordinal.to_string()))?;
            set.insert(day);
        }
        Ok(set)
    }

    /// Builds a set from english day names ("mon", "Wednesday", ...)
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ScheduleError> {
        let mut set = Self::new();
        for name in names {
            let day = Weekday::parse_name(name.as_ref())
                .ok_or_else(|| ScheduleError::InvalidWeekday(name.as_ref().to_string()))?;
            set.insert(day);
        }
        Ok(set)
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = Self::new();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.iter().map(|day| day.ordinal()).collect()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = ScheduleError;

    fn try_from(ordinals: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_ordinals(&ordinals)
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self
            .iter()
            .map(|day| day.to_short_en())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{names}")
    }
}
