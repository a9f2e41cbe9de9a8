//! Shared analysis result state.
//!
//! Holds the current result and the most recent queued result. Writes are
//! fenced by request sequence: each dispatch takes a number from
//! [`ResultStore::next_sequence`], and a write carrying a number older than
//! the latest accepted write is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use misland_analysis_models::{AnalysisRecord, QueuedResult};

#[derive(Debug, Default)]
struct Slots {
    accepted: Option<u64>,
    current: Option<AnalysisRecord>,
    queued: Option<QueuedResult>,
}

/// Current and queued analysis results.
#[derive(Debug, Default)]
pub struct ResultStore {
    sequence: AtomicU64,
    slots: RwLock<Slots>,
}

impl ResultStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the sequence number for a new request.
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, Slots> {
        self.slots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Slots> {
        self.slots.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores the result of request `seq`. Returns `false` if a newer
    /// request's result was already stored.
    pub fn store(&self, seq: u64, record: AnalysisRecord) -> bool {
        let mut slots = self.write();
        if slots.accepted.is_some_and(|accepted| seq < accepted) {
            log::debug!(
                "Dropping result of request {seq}; request {} already stored",
                slots.accepted.unwrap_or_default()
            );
            return false;
        }
        slots.accepted = Some(seq);
        slots.current = Some(record);
        true
    }

    /// Stores a completed queued task. Its inner result, when present,
    /// also becomes the current result.
    pub fn store_queued(&self, queued: QueuedResult) {
        let seq = self.next_sequence();
        let mut slots = self.write();
        if let Some(body) = queued.result.clone() {
            let indicator = slots.current.as_ref().and_then(|r| r.indicator.clone());
            slots.current = Some(AnalysisRecord::new(indicator, body));
            slots.accepted = Some(seq);
        }
        slots.queued = Some(queued);
    }

    /// The current result.
    #[must_use]
    pub fn current(&self) -> Option<AnalysisRecord> {
        self.read().current.clone()
    }

    /// The most recent queued result.
    #[must_use]
    pub fn queued(&self) -> Option<QueuedResult> {
        self.read().queued.clone()
    }

    /// Clears both slots.
    pub fn clear(&self) {
        let mut slots = self.write();
        slots.current = None;
        slots.queued = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use misland_indicator_models::IndicatorKind;
    use serde_json::json;

    fn record(tag: &str) -> AnalysisRecord {
        AnalysisRecord::new(Some(IndicatorKind::LandCover), json!({"tag": tag}))
    }

    #[test]
    fn older_request_cannot_overwrite_newer() {
        let store = ResultStore::new();
        let older = store.next_sequence();
        let newer = store.next_sequence();

        assert!(store.store(newer, record("new")));
        assert!(!store.store(older, record("old")));
        assert_eq!(store.current().unwrap().body["tag"], "new");
    }

    #[test]
    fn in_order_writes_replace() {
        let store = ResultStore::new();
        let first = store.next_sequence();
        let second = store.next_sequence();
        assert!(store.store(first, record("a")));
        assert!(store.store(second, record("b")));
        assert_eq!(store.current().unwrap().body["tag"], "b");
    }

    #[test]
    fn queued_result_replaces_current() {
        let store = ResultStore::new();
        let seq = store.next_sequence();
        store.store(seq, record("a"));

        let queued: QueuedResult =
            serde_json::from_value(json!({"id": 3, "result": {"stats": [], "tag": "queued"}}))
                .unwrap();
        store.store_queued(queued);

        let current = store.current().unwrap();
        assert_eq!(current.body["tag"], "queued");
        assert_eq!(current.indicator, Some(IndicatorKind::LandCover));
        assert_eq!(store.queued().unwrap().task["id"], 3);

        // A request dispatched before the queued result landed is stale.
        assert!(!store.store(seq, record("late")));
    }

    #[test]
    fn clear_empties_slots() {
        let store = ResultStore::new();
        store.store(store.next_sequence(), record("a"));
        store.clear();
        assert!(store.current().is_none());
        assert!(store.queued().is_none());
    }
}
