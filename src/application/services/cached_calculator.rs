use crate::application::services::occurrence_calculator::OccurrenceCalculator;
use crate::domain::entities::schedule::Schedule;
use crate::domain::errors::ScheduleResult;
use crate::infrastructure::config::EngineConfig;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Wraps the pure calculator with a schedule's occurrence cache.
///
/// Every method takes the schedule by `&mut`: callers that share schedules across
/// tasks must hold the schedule's lock for the whole call.
#[derive(Debug, Clone)]
pub struct CachedCalculator {
    calculator: OccurrenceCalculator,
    ttl: Duration,
}

impl Default for CachedCalculator {
    fn default() -> Self {
        Self::new(OccurrenceCalculator::default(), Duration::hours(1))
    }
}

impl CachedCalculator {
    pub fn new(calculator: OccurrenceCalculator, ttl: Duration) -> Self {
        Self { calculator, ttl }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(OccurrenceCalculator::from_config(config), config.cache_ttl)
    }

    pub fn calculator(&self) -> &OccurrenceCalculator {
        &self.calculator
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Next occurrence after `reference`, served from the cache while it is fresh
    pub fn next_occurrence(
        &self,
        schedule: &mut Schedule,
        reference: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Option<DateTime<Utc>>> {
        if let Some(cached) = schedule.cache().lookup(reference, now) {
            debug!(%reference, %cached, "Occurrence cache hit");
            return Ok(Some(cached));
        }

        let next = self.calculator.compute_next(schedule, reference)?;
        schedule.cache_mut().store(reference, next, now, self.ttl);
        Ok(next)
    }

    /// Recomputes the occurrence after `now` and stores it, ignoring any cached value
    pub fn refresh_cache(
        &self,
        schedule: &mut Schedule,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Option<DateTime<Utc>>> {
        let next = self.calculator.compute_next(schedule, now)?;
        schedule.cache_mut().store(now, next, now, self.ttl);
        debug!(%now, next = ?next, "Occurrence cache refreshed");
        Ok(next)
    }
}
