use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::schedule::Schedule;
use crate::domain::errors::ScheduleResult;
use crate::domain::repositories::schedule_repository::{ScheduleHandle, ScheduleRepository};

/// In-memory arena of schedules, each behind its own lock.
///
/// The map lock is only held to look a handle up; cache updates on one schedule
/// never block queries on another.
#[derive(Debug)]
pub struct MemoryScheduleRepository {
    schedules: RwLock<BTreeMap<u64, ScheduleHandle>>,
    next_id: AtomicU64,
}

impl MemoryScheduleRepository {
    pub fn new() -> Self {
        Self {
            schedules: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for MemoryScheduleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScheduleRepository for MemoryScheduleRepository {
    async fn insert(&self, schedule: Schedule) -> ScheduleResult<u64> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut schedules = self.schedules.write().await;
        schedules.insert(id, Arc::new(Mutex::new(schedule)));
        Ok(id)
    }

    async fn handle(&self, id: u64) -> ScheduleResult<Option<ScheduleHandle>> {
        let schedules = self.schedules.read().await;
        Ok(schedules.get(&id).cloned())
    }

    async fn remove(&self, id: u64) -> ScheduleResult<Option<Schedule>> {
        let removed = self.schedules.write().await.remove(&id);
        match removed {
            Some(handle) => Ok(Some(handle.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn ids(&self) -> ScheduleResult<Vec<u64>> {
        let schedules = self.schedules.read().await;
        Ok(schedules.keys().copied().collect())
    }
}
