pub mod cached_calculator;
pub mod enumeration;
pub mod occurrence_calculator;
pub mod schedule_service;

pub use cached_calculator::CachedCalculator;
pub use enumeration::Occurrences;
pub use occurrence_calculator::{CustomRule, OccurrenceCalculator, compute_next};
pub use schedule_service::ScheduleService;
