//! Bridge counters
//!
//! - Counters only, monotonic
//! - Shared by every table of a module
//! - Relaxed ordering; values are informational

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters for planning and streaming
#[derive(Debug, Default)]
pub struct BridgeMetrics {
    plans_created: AtomicU64,
    plans_deprioritized: AtomicU64,
    cursors_opened: AtomicU64,
    cursors_closed: AtomicU64,
    filters_issued: AtomicU64,
    rows_streamed: AtomicU64,
    stream_errors: AtomicU64,
    mapping_errors: AtomicU64,
    filter_errors: AtomicU64,
}

impl BridgeMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_plans(&self) {
        self.plans_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Plan whose cost was forced to maximum for missing required keys
    pub fn increment_deprioritized(&self) {
        self.plans_deprioritized.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cursors_opened(&self) {
        self.cursors_opened.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_cursors_closed(&self) {
        self.cursors_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_filters(&self) {
        self.filters_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rows(&self) {
        self.rows_streamed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_stream_errors(&self) {
        self.stream_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_mapping_errors(&self) {
        self.mapping_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Filter rejected before any remote call (bad token, missing argument)
    pub fn increment_filter_errors(&self) {
        self.filter_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            plans_created: self.plans_created.load(Ordering::Relaxed),
            plans_deprioritized: self.plans_deprioritized.load(Ordering::Relaxed),
            cursors_opened: self.cursors_opened.load(Ordering::Relaxed),
            cursors_closed: self.cursors_closed.load(Ordering::Relaxed),
            filters_issued: self.filters_issued.load(Ordering::Relaxed),
            rows_streamed: self.rows_streamed.load(Ordering::Relaxed),
            stream_errors: self.stream_errors.load(Ordering::Relaxed),
            mapping_errors: self.mapping_errors.load(Ordering::Relaxed),
            filter_errors: self.filter_errors.load(Ordering::Relaxed),
        }
    }
}

/// Immutable counter values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub plans_created: u64,
    pub plans_deprioritized: u64,
    pub cursors_opened: u64,
    pub cursors_closed: u64,
    pub filters_issued: u64,
    pub rows_streamed: u64,
    pub stream_errors: u64,
    pub mapping_errors: u64,
    pub filter_errors: u64,
}

impl MetricsSnapshot {
    /// Cursors opened but not yet closed
    pub fn open_cursors(&self) -> u64 {
        self.cursors_opened.saturating_sub(self.cursors_closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = BridgeMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_open_cursor_count() {
        let metrics = BridgeMetrics::new();
        metrics.increment_cursors_opened();
        metrics.increment_cursors_opened();
        metrics.increment_cursors_closed();

        let snap = metrics.snapshot();
        assert_eq!(snap.cursors_opened, 2);
        assert_eq!(snap.open_cursors(), 1);
    }

    #[test]
    fn test_concurrent_increments() {
        use std::sync::Arc;
        use std::thread;

        let metrics = Arc::new(BridgeMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let m = Arc::clone(&metrics);
                thread::spawn(move || {
                    for _ in 0..100 {
                        m.increment_rows();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(metrics.snapshot().rows_streamed, 400);
    }
}
