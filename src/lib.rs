//! Recurrence scheduling: next-occurrence calculation, forward enumeration and
//! date validity for recurring task schedules.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod utils;

pub use application::{
    CachedCalculator, CustomRule, OccurrenceCalculator, ScheduleDraft, ScheduleService, compute_next,
};
pub use domain::{
    MonthlyRule, OccurrenceCache, Recurrence, Schedule, ScheduleBuilder, ScheduleError,
    ScheduleHandle, ScheduleRepository, ScheduleResult, TimeWindow, WeekPosition, WeekdaySet,
};
pub use infrastructure::{Clock, EngineConfig, FixedClock, MemoryScheduleRepository, SystemClock};
pub use utils::setup_logging;
