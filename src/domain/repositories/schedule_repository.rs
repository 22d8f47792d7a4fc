use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::entities::schedule::Schedule;
use crate::domain::errors::ScheduleResult;

/// Exclusive access to one stored schedule. Holding the lock serializes its cache updates.
pub type ScheduleHandle = Arc<Mutex<Schedule>>;

#[async_trait]
pub trait ScheduleRepository: Send + Sync + Debug {
    /// Store a schedule and return its assigned id
    async fn insert(&self, schedule: Schedule) -> ScheduleResult<u64>;

    /// Lock handle for a schedule, if it exists
    async fn handle(&self, id: u64) -> ScheduleResult<Option<ScheduleHandle>>;

    /// Remove a schedule, returning it if it existed
    async fn remove(&self, id: u64) -> ScheduleResult<Option<Schedule>>;

    /// Ids of every stored schedule, ascending
    async fn ids(&self) -> ScheduleResult<Vec<u64>>;

    /// Copy of a schedule's current state
    async fn get(&self, id: u64) -> ScheduleResult<Option<Schedule>> {
        match self.handle(id).await? {
            Some(handle) => Ok(Some(handle.lock().await.clone())),
            None => Ok(None),
        }
    }

    async fn exists(&self, id: u64) -> ScheduleResult<bool> {
        Ok(self.handle(id).await?.is_some())
    }
}
