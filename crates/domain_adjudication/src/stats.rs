//! Running adjudication statistics

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-wide counters over every terminal pipeline outcome
///
/// All fields are atomics: concurrent adjudications record outcomes without
/// locking, and no update can be lost to a read-modify-write race. Counters
/// only grow; `reset` is the single operator-initiated way to clear them.
#[derive(Debug, Default)]
pub struct StatisticsAggregator {
    total: AtomicU64,
    approved: AtomicU64,
    rejected: AtomicU64,
    total_processing_ms: AtomicU64,
}

/// Read-only view of the aggregator at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total_claims: u64,
    pub approved_claims: u64,
    pub rejected_claims: u64,
    pub avg_processing_time_ms: u64,
    /// Fraction of claims approved, 0.0 to 1.0
    pub approval_rate: f64,
}

impl StatisticsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one terminal outcome
    pub fn record(&self, approved: bool, duration: Duration) {
        self.total.fetch_add(1, Ordering::Relaxed);
        if approved {
            self.approved.fetch_add(1, Ordering::Relaxed);
        } else {
            self.rejected.fetch_add(1, Ordering::Relaxed);
        }
        self.total_processing_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Snapshot of the current counters
    pub fn snapshot(&self) -> StatsSnapshot {
        let total = self.total.load(Ordering::Relaxed);
        let approved = self.approved.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let total_ms = self.total_processing_ms.load(Ordering::Relaxed);

        StatsSnapshot {
            total_claims: total,
            approved_claims: approved,
            rejected_claims: rejected,
            avg_processing_time_ms: if total > 0 { total_ms / total } else { 0 },
            approval_rate: if total > 0 {
                approved as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Zeroes all counters
    pub fn reset(&self) {
        self.total.store(0, Ordering::Relaxed);
        self.approved.store(0, Ordering::Relaxed);
        self.rejected.store(0, Ordering::Relaxed);
        self.total_processing_ms.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_record_and_snapshot() {
        let stats = StatisticsAggregator::new();
        stats.record(true, Duration::from_millis(100));
        stats.record(true, Duration::from_millis(200));
        stats.record(false, Duration::from_millis(300));

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_claims, 3);
        assert_eq!(snapshot.approved_claims, 2);
        assert_eq!(snapshot.rejected_claims, 1);
        assert_eq!(snapshot.avg_processing_time_ms, 200);
        assert!((snapshot.approval_rate - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = StatisticsAggregator::new().snapshot();
        assert_eq!(snapshot.total_claims, 0);
        assert_eq!(snapshot.avg_processing_time_ms, 0);
        assert_eq!(snapshot.approval_rate, 0.0);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let stats = StatisticsAggregator::new();
        stats.record(true, Duration::from_millis(50));
        stats.reset();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_claims, 0);
        assert_eq!(snapshot.approved_claims, 0);
        assert_eq!(snapshot.rejected_claims, 0);
        assert_eq!(snapshot.avg_processing_time_ms, 0);
    }

    #[test]
    fn test_concurrent_records_lose_nothing() {
        let stats = Arc::new(StatisticsAggregator::new());
        let mut handles = Vec::new();

        for i in 0..8 {
            let stats = Arc::clone(&stats);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1000 {
                    stats.record(i % 2 == 0, Duration::from_millis(1));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total_claims, 8000);
        assert_eq!(snapshot.approved_claims, 4000);
        assert_eq!(snapshot.rejected_claims, 4000);
    }
}
