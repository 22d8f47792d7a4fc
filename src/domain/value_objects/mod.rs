pub mod calendar;
pub mod recurrence;
pub mod weekday_format;
pub mod weekday_set;

pub use recurrence::{MonthlyRule, Recurrence, StepUnit, WeekPosition};
pub use weekday_format::WeekdayFormat;
pub use weekday_set::WeekdaySet;
