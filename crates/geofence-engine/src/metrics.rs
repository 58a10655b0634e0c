//! Counters for engine operations

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by every evaluation
#[derive(Debug, Default)]
pub struct EngineMetrics {
    evaluations: AtomicU64,
    transitions: AtomicU64,
    exits_published: AtomicU64,
    failures: AtomicU64,
}

/// Point-in-time copy of [`EngineMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Completed evaluations (successful or not)
    pub evaluations: u64,
    /// Successful evaluations with `state_changed = true`
    pub transitions: u64,
    /// Exit events accepted by the sink
    pub exits_published: u64,
    /// Evaluations that returned an error
    pub failures: u64,
}

impl EngineMetrics {
    /// Create zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_evaluation(&self, state_changed: bool) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        if state_changed {
            self.transitions.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_exit(&self) {
        self.exits_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.evaluations.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            evaluations: self.evaluations.load(Ordering::Relaxed),
            transitions: self.transitions.load(Ordering::Relaxed),
            exits_published: self.exits_published.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.evaluations.store(0, Ordering::Relaxed);
        self.transitions.store(0, Ordering::Relaxed);
        self.exits_published.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
    }
}

impl MetricsSnapshot {
    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Engine Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Evaluations: {}", self.evaluations),
            format!("Transitions: {}", self.transitions),
            format!("Exit events published: {}", self.exits_published),
            format!("Failures: {}", self.failures),
        ]
        .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = EngineMetrics::new();
        metrics.record_evaluation(true);
        metrics.record_evaluation(false);
        metrics.record_exit();
        metrics.record_failure();

        let snap = metrics.snapshot();
        assert_eq!(snap.evaluations, 3);
        assert_eq!(snap.transitions, 1);
        assert_eq!(snap.exits_published, 1);
        assert_eq!(snap.failures, 1);
        assert!(snap.summary().contains("Exit events published: 1"));

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }
}
