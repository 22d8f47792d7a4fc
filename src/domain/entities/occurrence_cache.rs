use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Last computed occurrence of a schedule, valid until `expires_at`.
///
/// An entry answers a query only when the reference lies in
/// `[computed_for, next)`: every instant in that range has the same next occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceCache {
    next: Option<DateTime<Utc>>,
    computed_for: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    last_calculated_at: Option<DateTime<Utc>>,
}

impl OccurrenceCache {
    pub fn lookup(&self, reference: DateTime<Utc>, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let next = self.next?;
        let computed_for = self.computed_for?;
        let fresh = self.expires_at.is_some_and(|expiry| expiry > now);

        (fresh && computed_for <= reference && next > reference).then_some(next)
    }

    pub fn store(
        &mut self,
        reference: DateTime<Utc>,
        next: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) {
        self.next = next;
        self.computed_for = Some(reference);
        self.expires_at = Some(now + ttl);
        self.last_calculated_at = Some(now);
    }

    /// Drops the cached occurrence; `last_calculated_at` is kept for diagnostics
    pub fn clear(&mut self) {
        self.next = None;
        self.computed_for = None;
        self.expires_at = None;
    }

    pub fn next(&self) -> Option<DateTime<Utc>> {
        self.next
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn last_calculated_at(&self) -> Option<DateTime<Utc>> {
        self.last_calculated_at
    }
}
