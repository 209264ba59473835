//! Logger metrics for observability
//!
//! Counters for monitoring pipeline health: how many events reached the
//! sinks, how many fan-outs reported a failure, and how many events arrived
//! after shutdown.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// Shared by every handle derived from the same root logger.
///
/// # Example
///
/// ```
/// use logpipe::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_logged();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.total_logged(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events that passed sampling and reached the fan-out
    total_logged: AtomicU64,

    /// Events for which at least one sink reported an error
    write_failures: AtomicU64,

    /// Flushes that returned an error
    flush_failures: AtomicU64,

    /// Events discarded because the pipeline was already shut down
    after_shutdown: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            total_logged: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            flush_failures: AtomicU64::new(0),
            after_shutdown: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn flush_failures(&self) -> u64 {
        self.flush_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn after_shutdown(&self) -> u64 {
        self.after_shutdown.load(Ordering::Relaxed)
    }

    /// Record an event handed to the sinks
    #[inline]
    pub fn record_logged(&self) -> u64 {
        self.total_logged.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_flush_failure(&self) -> u64 {
        self.flush_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_after_shutdown(&self) -> u64 {
        self.after_shutdown.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if no logs have been processed.
    pub fn failure_rate(&self) -> f64 {
        let total = self.total_logged() as f64;
        if total == 0.0 {
            0.0
        } else {
            (self.write_failures() as f64 / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.total_logged.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.flush_failures.store(0, Ordering::Relaxed);
        self.after_shutdown.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            total_logged: AtomicU64::new(self.total_logged()),
            write_failures: AtomicU64::new(self.write_failures()),
            flush_failures: AtomicU64::new(self.flush_failures()),
            after_shutdown: AtomicU64::new(self.after_shutdown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_new() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.flush_failures(), 0);
        assert_eq!(metrics.after_shutdown(), 0);
    }

    #[test]
    fn test_metrics_record_logged() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.record_logged(), 0); // Returns previous value
        metrics.record_logged();
        assert_eq!(metrics.total_logged(), 2);
    }

    #[test]
    fn test_metrics_failure_rate() {
        let metrics = LoggerMetrics::new();
        assert_eq!(metrics.failure_rate(), 0.0);

        for _ in 0..200 {
            metrics.record_logged();
        }
        for _ in 0..10 {
            metrics.record_write_failure();
        }
        let rate = metrics.failure_rate();
        assert!((rate - 5.0).abs() < 1e-9, "Failure rate was {}", rate);
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_write_failure();
        metrics.record_after_shutdown();

        metrics.reset();

        assert_eq!(metrics.total_logged(), 0);
        assert_eq!(metrics.write_failures(), 0);
        assert_eq!(metrics.after_shutdown(), 0);
    }

    #[test]
    fn test_metrics_clone() {
        let metrics = LoggerMetrics::new();
        metrics.record_logged();
        metrics.record_flush_failure();

        let snapshot = metrics.clone();
        assert_eq!(snapshot.total_logged(), 1);
        assert_eq!(snapshot.flush_failures(), 1);

        // Original and clone are independent
        metrics.record_logged();
        assert_eq!(metrics.total_logged(), 2);
        assert_eq!(snapshot.total_logged(), 1);
    }
}
