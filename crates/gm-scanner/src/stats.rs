//! Scan statistics with atomic counters.
//!
//! This module provides [`ScanStats`] for counting during a scan and
//! [`StatsSnapshot`] for the values reported at the end.
//!
//! # Thread Safety
//!
//! All counters use [`AtomicU64`] with [`Relaxed`](std::sync::atomic::Ordering::Relaxed)
//! ordering. Statistics are informational and don't require strict ordering.
//!
//! # Examples
//!
//! ```
//! use gm_scanner::ScanStats;
//!
//! let stats = ScanStats::new();
//! stats.increment_visited();
//! stats.increment_relevant();
//!
//! let snapshot = stats.snapshot();
//! assert_eq!(snapshot.visited, 1);
//! assert_eq!(snapshot.relevant, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Atomic counters for scan statistics.
#[derive(Debug, Default)]
pub struct ScanStats {
    /// Go files read and parsed.
    visited: AtomicU64,
    /// Files that import the framework.
    relevant: AtomicU64,
    /// Entries skipped after a recoverable error.
    skipped: AtomicU64,
    /// Errors encountered, skipped or not.
    errors: AtomicU64,
}

impl ScanStats {
    /// Creates a new [`ScanStats`] with all counters at zero.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the visited files counter.
    #[inline]
    pub fn increment_visited(&self) {
        self.visited.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the relevant files counter.
    #[inline]
    pub fn increment_relevant(&self) {
        self.relevant.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the skipped entries counter.
    #[inline]
    pub fn increment_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Increments the error counter.
    #[inline]
    pub fn increment_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time snapshot of all statistics.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            visited: self.visited.load(Ordering::Relaxed),
            relevant: self.relevant.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of scan statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Go files read and parsed.
    pub visited: u64,
    /// Files that import the framework.
    pub relevant: u64,
    /// Entries skipped after a recoverable error.
    pub skipped: u64,
    /// Errors encountered.
    pub errors: u64,
}

impl StatsSnapshot {
    /// Share of visited files that use the framework, as a percentage.
    ///
    /// Returns 0.0 when nothing was visited.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn relevant_percent(&self) -> f64 {
        if self.visited == 0 {
            return 0.0;
        }
        (self.relevant as f64 / self.visited as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = ScanStats::new();
        stats.increment_visited();
        stats.increment_visited();
        stats.increment_relevant();
        stats.increment_errors();
        stats.increment_skipped();

        let snap = stats.snapshot();
        assert_eq!(snap.visited, 2);
        assert_eq!(snap.relevant, 1);
        assert_eq!(snap.skipped, 1);
        assert_eq!(snap.errors, 1);
    }

    #[test]
    fn test_relevant_percent() {
        let snap = StatsSnapshot {
            visited: 4,
            relevant: 1,
            ..StatsSnapshot::default()
        };
        assert!((snap.relevant_percent() - 25.0).abs() < f64::EPSILON);
        assert!(StatsSnapshot::default().relevant_percent().abs() < f64::EPSILON);
    }

    #[test]
    fn test_concurrent_increments() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(ScanStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_visited();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("thread panicked");
        }
        assert_eq!(stats.snapshot().visited, 400);
    }
}
