pub mod occurrence_cache;
pub mod schedule;
pub mod time_window;

pub use occurrence_cache::OccurrenceCache;
pub use schedule::{Schedule, ScheduleBuilder};
pub use time_window::TimeWindow;
