pub mod parsing;
pub mod services;

pub use parsing::ScheduleDraft;
pub use services::{CachedCalculator, CustomRule, OccurrenceCalculator, ScheduleService, compute_next};
