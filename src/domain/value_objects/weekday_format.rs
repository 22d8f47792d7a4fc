use chrono::Weekday;

/// Weekday helpers shared by the recurrence model and the draft parser.
///
/// Ordinals are Sunday-first: Sunday = 1 ... Saturday = 7.
pub trait WeekdayFormat: Sized {
    fn to_short_en(&self) -> &'static str;
    fn ordinal(&self) -> u8;
    fn from_ordinal(ordinal: u8) -> Option<Self>;
    fn parse_name(s: &str) -> Option<Self>;
    fn is_workday(&self) -> bool;
    fn is_weekend(&self) -> bool;
}

impl WeekdayFormat for Weekday {
    /// Converts weekday to short english abbreviation
    fn to_short_en(&self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    fn ordinal(&self) -> u8 {
        // num_days_from_sunday is 0-based
        self.num_days_from_sunday() as u8 + 1
    }

    fn from_ordinal(ordinal: u8) -> Option<Weekday> {
        match ordinal {
            1 => Some(Weekday::Sun),
            2 => Some(Weekday::Mon),
            3 => Some(Weekday::Tue),
            4 => Some(Weekday::Wed),
            5 => Some(Weekday::Thu),
            6 => Some(Weekday::Fri),
            7 => Some(Weekday::Sat),
            _ => None,
        }
    }

    /// Parses an english weekday name or abbreviation, ignoring case and a trailing plural "s"
    fn parse_name(s: &str) -> Option<Weekday> {
        let lowered = s.trim().trim_end_matches('.').to_lowercase();
        let name = if lowered.len() > 3 && lowered.ends_with("days") {
            lowered.trim_end_matches('s')
        } else {
            lowered.as_str()
        };

        match name {
            "monday" | "mon" => Some(Weekday::Mon),
            "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
            "wednesday" | "wed" | "weds" => Some(Weekday::Wed),
            "thursday" | "thu" | "thur" | "thurs" => Some(Weekday::Thu),
            "friday" | "fri" => Some(Weekday::Fri),
            "saturday" | "sat" => Some(Weekday::Sat),
            "sunday" | "sun" => Some(Weekday::Sun),
            _ => None,
        }
    }

    /// Monday through Friday (ordinals 2 through 6)
    fn is_workday(&self) -> bool {
        (2..=6).contains(&self.ordinal())
    }

    fn is_weekend(&self) -> bool {
        !self.is_workday()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_are_sunday_first() {
        assert_eq!(Weekday::Sun.ordinal(), 1);
        assert_eq!(Weekday::Mon.ordinal(), 2);
        assert_eq!(Weekday::Sat.ordinal(), 7);

        for ordinal in 1..=7 {
            let weekday = Weekday::from_ordinal(ordinal).unwrap();
            assert_eq!(weekday.ordinal(), ordinal);
        }
        assert_eq!(Weekday::from_ordinal(0), None);
        assert_eq!(Weekday::from_ordinal(8), None);
    }

    #[test]
    fn parses_names_and_abbreviations() {
        assert_eq!(Weekday::parse_name("Monday"), Some(Weekday::Mon));
        assert_eq!(Weekday::parse_name(" tues "), Some(Weekday::Tue));
        assert_eq!(Weekday::parse_name("Thurs."), Some(Weekday::Thu));
        assert_eq!(Weekday::parse_name("Fridays"), Some(Weekday::Fri));
        assert_eq!(Weekday::parse_name("SUN"), Some(Weekday::Sun));
        assert_eq!(Weekday::parse_name("someday"), None);
    }

    #[test]
    fn workdays_and_weekends_partition_the_week() {
        let workdays = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri];
        for day in workdays {
            assert!(day.is_workday());
            assert!(!day.is_weekend());
        }
        assert!(Weekday::Sat.is_weekend());
        assert!(Weekday::Sun.is_weekend());
    }
}
