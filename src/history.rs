//! In-memory rolling history of accepted readings, per entity.
//!
//! Buffers are bounded FIFO queues created lazily on the first accepted
//! reading and kept for the lifetime of the process. A store-wide RwLock
//! keeps concurrent request handlers from corrupting a buffer; volumes
//! are small enough that finer-grained locking is not worth having.

use std::collections::{HashMap, VecDeque};
use tokio::sync::RwLock;

/// One accepted reading at one point in time. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryPoint {
    pub captured_at: i64,
    pub value_c: f64,
}

/// Process-wide store mapping entity id to its bounded history buffer.
///
/// Constructed once at startup and handed to request handlers through
/// `AppState`; capacity is fixed at construction and applies to every
/// entity uniformly.
#[derive(Debug)]
pub struct HistoryStore {
    capacity: usize,
    buffers: RwLock<HashMap<String, VecDeque<HistoryPoint>>>,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            buffers: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append an accepted reading to the entity's buffer, evicting the
    /// oldest point first when the buffer is full. Absent values are a
    /// no-op: the buffer only ever holds real readings.
    pub async fn record(&self, entity_id: &str, value_c: Option<f64>, captured_at: i64) {
        let Some(value_c) = value_c else {
            return;
        };

        let mut buffers = self.buffers.write().await;
        let buffer = buffers
            .entry(entity_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));
        if buffer.len() == self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(HistoryPoint { captured_at, value_c });
    }

    /// Current buffer contents oldest-first, or empty if the entity has
    /// never recorded a point. Returns a copy; the live buffer is never
    /// exposed.
    pub async fn snapshot(&self, entity_id: &str) -> Vec<HistoryPoint> {
        let buffers = self.buffers.read().await;
        buffers
            .get(entity_id)
            .map(|buffer| buffer.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_insertion_order() {
        let store = HistoryStore::new(10);
        store.record("sensor.a", Some(1.0), 100).await;
        store.record("sensor.a", Some(2.0), 200).await;

        let points = store.snapshot("sensor.a").await;
        assert_eq!(
            points,
            vec![
                HistoryPoint { captured_at: 100, value_c: 1.0 },
                HistoryPoint { captured_at: 200, value_c: 2.0 },
            ]
        );
    }

    #[tokio::test]
    async fn evicts_oldest_at_capacity() {
        let store = HistoryStore::new(5);
        for i in 1..=6 {
            store.record("sensor.a", Some(i as f64), i).await;
        }

        let points = store.snapshot("sensor.a").await;
        assert_eq!(points.len(), 5);
        assert_eq!(points.first(), Some(&HistoryPoint { captured_at: 2, value_c: 2.0 }));
        assert_eq!(points.last(), Some(&HistoryPoint { captured_at: 6, value_c: 6.0 }));
        let stamps: Vec<i64> = points.iter().map(|p| p.captured_at).collect();
        assert_eq!(stamps, vec![2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn absent_value_is_a_noop() {
        let store = HistoryStore::new(5);
        store.record("sensor.a", Some(1.0), 100).await;
        store.record("sensor.a", None, 200).await;

        assert_eq!(store.snapshot("sensor.a").await.len(), 1);
    }

    #[tokio::test]
    async fn unseen_entity_snapshots_empty() {
        let store = HistoryStore::new(5);
        assert!(store.snapshot("sensor.never").await.is_empty());
    }

    #[tokio::test]
    async fn buffers_are_independent_per_entity() {
        let store = HistoryStore::new(2);
        store.record("sensor.a", Some(1.0), 100).await;
        store.record("sensor.b", Some(9.0), 100).await;
        store.record("sensor.a", Some(2.0), 200).await;
        store.record("sensor.a", Some(3.0), 300).await;

        assert_eq!(store.snapshot("sensor.a").await.len(), 2);
        assert_eq!(store.snapshot("sensor.b").await.len(), 1);
    }

    #[tokio::test]
    async fn snapshot_is_a_copy() {
        let store = HistoryStore::new(5);
        store.record("sensor.a", Some(1.0), 100).await;

        let mut points = store.snapshot("sensor.a").await;
        points.clear();
        assert_eq!(store.snapshot("sensor.a").await.len(), 1);
    }
}
