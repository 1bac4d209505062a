//! Diagnostic counters for a tree. These are purely observational: nothing here
//! affects the result of an insert, k-NN query or range query, only what gets reported
//! through a worker's `/status` endpoint.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters tracking the lifetime activity of a tree. Safe to read concurrently
/// with readers and writers of the tree itself.
#[derive(Debug, Default)]
pub struct TreeMetrics {
    inserts: AtomicU64,
    splits: AtomicU64,
    node_visits: AtomicU64,
    distance_evaluations: AtomicU64,
}

impl TreeMetrics {
    /// A fresh, zeroed counter set.
    pub fn new() -> Self {
        TreeMetrics::default()
    }

    pub(crate) fn record_insert(&self) {
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_split(&self) {
        self.splits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_node_visit(&self) {
        self.node_visits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_distance_evaluations(&self, n: u64) {
        self.distance_evaluations.fetch_add(n, Ordering::Relaxed);
    }

    /// A point-in-time, non-atomic-across-fields snapshot suitable for serialization.
    pub fn snapshot(&self) -> TreeMetricsSnapshot {
        TreeMetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            splits: self.splits.load(Ordering::Relaxed),
            node_visits: self.node_visits.load(Ordering::Relaxed),
            distance_evaluations: self.distance_evaluations.load(Ordering::Relaxed),
        }
    }
}

/// Serializable snapshot of [`TreeMetrics`], embedded in a worker's `/status` response
/// under `m_tree_metrics`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeMetricsSnapshot {
    pub inserts: u64,
    pub splits: u64,
    pub node_visits: u64,
    pub distance_evaluations: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let m = TreeMetrics::new();
        assert_eq!(m.snapshot(), TreeMetricsSnapshot::default());
    }

    #[test]
    fn counters_accumulate() {
        let m = TreeMetrics::new();
        m.record_insert();
        m.record_insert();
        m.record_split();
        m.record_node_visit();
        m.record_distance_evaluations(7);
        let snap = m.snapshot();
        assert_eq!(snap.inserts, 2);
        assert_eq!(snap.splits, 1);
        assert_eq!(snap.node_visits, 1);
        assert_eq!(snap.distance_evaluations, 7);
    }
}
