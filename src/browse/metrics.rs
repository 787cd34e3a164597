// Session Metrics
//
// Counters shown in the metrics panel. Monotonic for the life of the
// process; only a full restart resets them.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    calls_made: AtomicU64,
    calls_saved: AtomicU64,
    search_events: AtomicU64,
    scroll_events: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub calls_made: u64,
    pub calls_saved: u64,
    pub search_events: u64,
    pub scroll_events: u64,
}

impl MetricsSnapshot {
    /// Share of avoided calls among all calls that would have been made, 0-100
    pub fn efficiency_percent(&self) -> u32 {
        let total = self.calls_made + self.calls_saved;
        if total == 0 {
            return 0;
        }
        ((self.calls_saved as f64 / total as f64) * 100.0).round() as u32
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_call(&self) {
        self.calls_made.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.calls_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_search_event(&self) {
        self.search_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scroll_event(&self) {
        self.scroll_events.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls_made: self.calls_made.load(Ordering::Relaxed),
            calls_saved: self.calls_saved.load(Ordering::Relaxed),
            search_events: self.search_events.load(Ordering::Relaxed),
            scroll_events: self.scroll_events.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_empty() {
        assert_eq!(MetricsSnapshot::default().efficiency_percent(), 0);
    }

    #[test]
    fn test_efficiency_rounds() {
        let metrics = Metrics::new();
        metrics.record_call();
        metrics.record_saved();
        metrics.record_saved();
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.calls_made, 1);
        assert_eq!(snapshot.calls_saved, 2);
        assert_eq!(snapshot.efficiency_percent(), 67);
    }
}
