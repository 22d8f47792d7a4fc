//! Forward sequences of occurrences built on repeated next-occurrence queries.

use crate::application::services::cached_calculator::CachedCalculator;
use crate::application::services::occurrence_calculator::OccurrenceCalculator;
use crate::domain::entities::schedule::Schedule;
use crate::domain::errors::ScheduleResult;
use chrono::{DateTime, Utc};

/// Lazily yields occurrences strictly after a starting instant, without touching the cache.
///
/// Ends after the schedule is exhausted or after the first error.
#[derive(Debug)]
pub struct Occurrences<'a> {
    calculator: &'a OccurrenceCalculator,
    schedule: &'a Schedule,
    reference: DateTime<Utc>,
    finished: bool,
}

impl Iterator for Occurrences<'_> {
    type Item = ScheduleResult<DateTime<Utc>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.calculator.compute_next(self.schedule, self.reference) {
            Ok(Some(next)) => {
                self.reference = next;
                Some(Ok(next))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl OccurrenceCalculator {
    pub fn occurrences<'a>(&'a self, schedule: &'a Schedule, from: DateTime<Utc>) -> Occurrences<'a> {
        Occurrences {
            calculator: self,
            schedule,
            reference: from,
            finished: false,
        }
    }
}

impl CachedCalculator {
    /// Up to `count` occurrences after `from`; shorter if the schedule runs out
    pub fn next_n_occurrences(
        &self,
        schedule: &mut Schedule,
        count: usize,
        from: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Vec<DateTime<Utc>>> {
        // `count` may be usize::MAX to mean "all remaining"
        let mut occurrences = Vec::with_capacity(count.min(64));
        let mut reference = from;

        while occurrences.len() < count {
            match self.next_occurrence(schedule, reference, now)? {
                Some(next) => {
                    occurrences.push(next);
                    reference = next;
                }
                None => break,
            }
        }

        Ok(occurrences)
    }

    /// Occurrences after `start` up to and including `end`, in increasing order
    pub fn occurrences_between(
        &self,
        schedule: &mut Schedule,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ScheduleResult<Vec<DateTime<Utc>>> {
        let mut occurrences = Vec::new();
        let mut reference = start;

        while let Some(next) = self.next_occurrence(schedule, reference, now)? {
            if next > end {
                break;
            }
            occurrences.push(next);
            reference = next;
        }

        Ok(occurrences)
    }
}
