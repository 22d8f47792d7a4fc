use crate::application::parsing::schedule_draft::ScheduleDraft;
use crate::application::services::cached_calculator::CachedCalculator;
use crate::domain::entities::schedule::Schedule;
use crate::domain::errors::{ScheduleError, ScheduleResult};
use crate::domain::repositories::schedule_repository::{ScheduleHandle, ScheduleRepository};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::config::EngineConfig;
use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entry point for callers that keep schedules in a repository.
///
/// Every cache read-modify-write runs under the schedule's own lock, so two
/// schedules never wait on each other.
#[derive(Clone)]
pub struct ScheduleService {
    repo: Arc<dyn ScheduleRepository>,
    calculator: CachedCalculator,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl ScheduleService {
    pub fn new(
        repo: Arc<dyn ScheduleRepository>,
        calculator: CachedCalculator,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        Self {
            repo,
            calculator,
            clock,
            config,
        }
    }

    pub fn from_config(
        repo: Arc<dyn ScheduleRepository>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
    ) -> Self {
        let calculator = CachedCalculator::from_config(&config);
        Self::new(repo, calculator, clock, config)
    }

    pub fn calculator(&self) -> &CachedCalculator {
        &self.calculator
    }

    async fn handle(&self, id: u64) -> ScheduleResult<ScheduleHandle> {
        self.repo
            .handle(id)
            .await?
            .ok_or(ScheduleError::NotFound(id))
    }

    // === REGISTRATION ===

    pub async fn register(&self, schedule: Schedule) -> ScheduleResult<u64> {
        let description = schedule.describe();
        let id = self.repo.insert(schedule).await?;
        info!("Registered schedule {}: {}", id, description);
        Ok(id)
    }

    /// Builds and stores every schedule a draft describes, returning their ids in draft order
    pub async fn register_draft(&self, draft: &ScheduleDraft) -> ScheduleResult<Vec<u64>> {
        let schedules = draft.into_schedules(&self.config, self.clock.now())?;
        let mut ids = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            ids.push(self.register(schedule).await?);
        }
        Ok(ids)
    }

    pub async fn remove(&self, id: u64) -> ScheduleResult<Schedule> {
        let removed = self
            .repo
            .remove(id)
            .await?
            .ok_or(ScheduleError::NotFound(id))?;
        info!("Removed schedule {}", id);
        Ok(removed)
    }

    pub async fn get(&self, id: u64) -> ScheduleResult<Schedule> {
        self.repo.get(id).await?.ok_or(ScheduleError::NotFound(id))
    }

    // === QUERIES ===

    pub async fn next_occurrence(
        &self,
        id: u64,
        reference: DateTime<Utc>,
    ) -> ScheduleResult<Option<DateTime<Utc>>> {
        let handle = self.handle(id).await?;
        let mut schedule = handle.lock().await;
        self.calculator
            .next_occurrence(&mut schedule, reference, self.clock.now())
    }

    /// Next `count` occurrences after the current time
    pub async fn upcoming(&self, id: u64, count: usize) -> ScheduleResult<Vec<DateTime<Utc>>> {
        let handle = self.handle(id).await?;
        let mut schedule = handle.lock().await;
        let now = self.clock.now();
        self.calculator
            .next_n_occurrences(&mut schedule, count, now, now)
    }

    pub async fn occurrences_between(
        &self,
        id: u64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ScheduleResult<Vec<DateTime<Utc>>> {
        let handle = self.handle(id).await?;
        let mut schedule = handle.lock().await;
        self.calculator
            .occurrences_between(&mut schedule, start, end, self.clock.now())
    }

    pub async fn is_valid_for_date(&self, id: u64, date: DateTime<Utc>) -> ScheduleResult<bool> {
        let handle = self.handle(id).await?;
        let schedule = handle.lock().await;
        Ok(schedule.is_valid_for_date(date))
    }

    /// Occurrences of every active schedule after now and up to `until`, merged in
    /// time order (ties by id), at most `limit` entries. Schedules whose calculation
    /// fails are logged and left out.
    pub async fn agenda(
        &self,
        until: DateTime<Utc>,
        limit: usize,
    ) -> ScheduleResult<Vec<(u64, DateTime<Utc>)>> {
        let now = self.clock.now();
        let mut heap: BinaryHeap<Reverse<(DateTime<Utc>, u64)>> = BinaryHeap::new();
        let mut handles = Vec::new();

        for id in self.repo.ids().await? {
            let Some(handle) = self.repo.handle(id).await? else {
                // removed since listing
                continue;
            };
            let next = {
                let mut schedule = handle.lock().await;
                if !schedule.is_active() {
                    continue;
                }
                match self.calculator.next_occurrence(&mut schedule, now, now) {
                    Ok(next) => next,
                    Err(e) => {
                        warn!("Leaving schedule {} out of the agenda: {}", id, e);
                        continue;
                    }
                }
            };
            if let Some(next) = next.filter(|t| *t <= until) {
                heap.push(Reverse((next, id)));
            }
            handles.push((id, handle));
        }

        let mut agenda = Vec::new();
        while agenda.len() < limit {
            let Some(Reverse((at, id))) = heap.pop() else {
                break;
            };
            agenda.push((id, at));

            let Some((_, handle)) = handles.iter().find(|(candidate, _)| *candidate == id) else {
                continue;
            };
            let following = {
                let mut schedule = handle.lock().await;
                match self.calculator.next_occurrence(&mut schedule, at, now) {
                    Ok(following) => following,
                    Err(e) => {
                        warn!("Stopping schedule {} in the agenda after {}: {}", id, at, e);
                        None
                    }
                }
            };
            if let Some(next) = following.filter(|t| *t <= until) {
                heap.push(Reverse((next, id)));
            }
        }

        debug!("Agenda until {} has {} entries", until, agenda.len());
        Ok(agenda)
    }

    // === STATE CHANGES ===

    pub async fn enable(&self, id: u64) -> ScheduleResult<()> {
        let handle = self.handle(id).await?;
        handle.lock().await.enable();
        info!("Enabled schedule {}", id);
        Ok(())
    }

    pub async fn disable(&self, id: u64) -> ScheduleResult<()> {
        let handle = self.handle(id).await?;
        handle.lock().await.disable();
        info!("Disabled schedule {}", id);
        Ok(())
    }

    /// Recomputes a schedule's cached occurrence from the current time
    pub async fn refresh(&self, id: u64) -> ScheduleResult<Option<DateTime<Utc>>> {
        let handle = self.handle(id).await?;
        let mut schedule = handle.lock().await;
        self.calculator.refresh_cache(&mut schedule, self.clock.now())
    }
}
