pub mod entities;
pub mod errors;
pub mod repositories;
pub mod value_objects;

pub use entities::{OccurrenceCache, Schedule, ScheduleBuilder, TimeWindow};
pub use errors::{ScheduleError, ScheduleResult};
pub use repositories::{ScheduleHandle, ScheduleRepository};
pub use value_objects::{MonthlyRule, Recurrence, WeekPosition, WeekdayFormat, WeekdaySet};
