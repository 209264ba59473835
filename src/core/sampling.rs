//! Duplicate-suppressing log sampling
//!
//! Within a window (one second by default), each distinct `(level, message)`
//! pair may pass `initial` times; after that only every `thereafter`-th
//! occurrence passes. A key's count restarts once its window has elapsed.
//!
//! # Example
//!
//! ```
//! use logpipe::{LogLevel, LogSampler, SamplingPolicy};
//!
//! let sampler = LogSampler::new(SamplingPolicy::new(2, 3));
//!
//! let passed: Vec<usize> = (1..=10)
//!     .filter(|_| sampler.should_sample(LogLevel::Info, "cache miss"))
//!     .collect();
//!
//! assert_eq!(passed, vec![1, 2, 5, 8]);
//! ```

use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::sink::Sink;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default sampling window
pub const DEFAULT_SAMPLING_TICK: Duration = Duration::from_secs(1);

/// Above this many tracked messages per level, expired counters are pruned
const PRUNE_THRESHOLD: usize = 4096;

/// Sampling policy for repeated log entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPolicy {
    /// Entries with the same level and message allowed per window
    pub initial: u64,

    /// After `initial`, every `thereafter`-th duplicate is allowed; 0 drops them all
    pub thereafter: u64,
}

impl Default for SamplingPolicy {
    fn default() -> Self {
        Self {
            initial: 100,
            thereafter: 100,
        }
    }
}

impl SamplingPolicy {
    pub fn new(initial: u64, thereafter: u64) -> Self {
        Self {
            initial,
            thereafter,
        }
    }

    /// `initial == 0` turns sampling off entirely
    pub fn is_enabled(&self) -> bool {
        self.initial > 0
    }

    /// Decision for the `n`-th (1-indexed) occurrence of a key within a window
    #[inline]
    pub fn allows(&self, n: u64) -> bool {
        if n <= self.initial {
            return true;
        }
        self.thereafter > 0 && (n - self.initial) % self.thereafter == 0
    }
}

/// Metrics for sampling observability
///
/// # Example
///
/// ```
/// use logpipe::SamplerMetrics;
///
/// let metrics = SamplerMetrics::new();
/// assert_eq!(metrics.sampled_count(), 0);
/// assert_eq!(metrics.dropped_count(), 0);
/// ```
#[derive(Debug)]
pub struct SamplerMetrics {
    /// Number of logs that passed sampling (were logged)
    sampled_count: AtomicU64,

    /// Number of logs dropped by sampling
    dropped_count: AtomicU64,

    /// Total number of logs processed by sampler
    total_count: AtomicU64,
}

impl SamplerMetrics {
    /// Create new metrics with all counters at zero
    pub const fn new() -> Self {
        Self {
            sampled_count: AtomicU64::new(0),
            dropped_count: AtomicU64::new(0),
            total_count: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn sampled_count(&self) -> u64 {
        self.sampled_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn total_count(&self) -> u64 {
        self.total_count.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn record_sampled(&self) {
        self.sampled_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_dropped(&self) {
        self.dropped_count.fetch_add(1, Ordering::Relaxed);
        self.total_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the effective sample rate based on actual sampling
    ///
    /// Returns 1.0 if no logs have been processed yet.
    pub fn effective_sample_rate(&self) -> f64 {
        let sampled = self.sampled_count() as f64;
        let total = self.total_count() as f64;

        if total == 0.0 {
            1.0
        } else {
            sampled / total
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.sampled_count.store(0, Ordering::Relaxed);
        self.dropped_count.store(0, Ordering::Relaxed);
        self.total_count.store(0, Ordering::Relaxed);
    }
}

impl Default for SamplerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
struct Counter {
    window_start: Instant,
    count: u64,
}

impl Counter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            count: 0,
        }
    }

    fn increment(&mut self, now: Instant, tick: Duration) -> u64 {
        if now.saturating_duration_since(self.window_start) >= tick {
            self.window_start = now;
            self.count = 0;
        }
        self.count += 1;
        self.count
    }
}

/// Per-`(level, message)` window counters
///
/// # Thread Safety
///
/// Counters for each level sit behind their own mutex; the critical section
/// is one map lookup and an increment.
pub struct LogSampler {
    policy: SamplingPolicy,
    tick: Duration,
    counters: [Mutex<HashMap<String, Counter>>; LogLevel::ALL.len()],
    metrics: SamplerMetrics,
}

impl LogSampler {
    /// Create a sampler with the default one-second window
    pub fn new(policy: SamplingPolicy) -> Self {
        Self::with_tick(policy, DEFAULT_SAMPLING_TICK)
    }

    /// Create a sampler with a custom window length
    pub fn with_tick(policy: SamplingPolicy, tick: Duration) -> Self {
        Self {
            policy,
            tick,
            counters: std::array::from_fn(|_| Mutex::new(HashMap::new())),
            metrics: SamplerMetrics::new(),
        }
    }

    /// Count one occurrence and decide whether it should be written
    pub fn should_sample(&self, level: LogLevel, message: &str) -> bool {
        self.should_sample_at(level, message, Instant::now())
    }

    pub(crate) fn should_sample_at(&self, level: LogLevel, message: &str, now: Instant) -> bool {
        if !self.policy.is_enabled() {
            self.metrics.record_sampled();
            return true;
        }

        let n = {
            let mut counters = self.counters[level.as_u8() as usize].lock();

            if counters.len() >= PRUNE_THRESHOLD && !counters.contains_key(message) {
                let tick = self.tick;
                counters.retain(|_, c| now.saturating_duration_since(c.window_start) < tick);
            }

            match counters.get_mut(message) {
                Some(counter) => counter.increment(now, self.tick),
                None => counters
                    .entry(message.to_string())
                    .or_insert_with(|| Counter::new(now))
                    .increment(now, self.tick),
            }
        };

        let sample = self.policy.allows(n);
        if sample {
            self.metrics.record_sampled();
        } else {
            self.metrics.record_dropped();
        }
        sample
    }

    pub fn metrics(&self) -> &SamplerMetrics {
        &self.metrics
    }

    pub fn policy(&self) -> &SamplingPolicy {
        &self.policy
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }
}

impl std::fmt::Debug for LogSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSampler")
            .field("policy", &self.policy)
            .field("tick", &self.tick)
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Sink decorator applying one shared [`LogSampler`] in front of `inner`
///
/// Wrapping the whole fan-out keeps a single counter per key no matter how
/// many destinations sit behind it.
pub struct SampledSink {
    inner: Box<dyn Sink>,
    sampler: Arc<LogSampler>,
}

impl SampledSink {
    pub fn new(inner: Box<dyn Sink>, sampler: Arc<LogSampler>) -> Self {
        Self { inner, sampler }
    }

    pub fn sampler(&self) -> &LogSampler {
        &self.sampler
    }
}

impl Sink for SampledSink {
    fn enabled(&self, level: LogLevel) -> bool {
        self.inner.enabled(level)
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        if !self.sampler.should_sample(entry.level, &entry.message) {
            return Ok(());
        }
        self.inner.write(entry)
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn name(&self) -> &str {
        "sampler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default() {
        let policy = SamplingPolicy::default();
        assert_eq!(policy.initial, 100);
        assert_eq!(policy.thereafter, 100);
        assert!(policy.is_enabled());
        assert!(!SamplingPolicy::new(0, 5).is_enabled());
    }

    #[test]
    fn test_policy_allows() {
        let policy = SamplingPolicy::new(2, 3);
        let allowed: Vec<u64> = (1..=10).filter(|n| policy.allows(*n)).collect();
        assert_eq!(allowed, vec![1, 2, 5, 8]);

        let drop_rest = SamplingPolicy::new(3, 0);
        let allowed: Vec<u64> = (1..=10).filter(|n| drop_rest.allows(*n)).collect();
        assert_eq!(allowed, vec![1, 2, 3]);
    }

    #[test]
    fn test_window_reset() {
        let sampler = LogSampler::new(SamplingPolicy::new(1, 0));
        let start = Instant::now();

        assert!(sampler.should_sample_at(LogLevel::Info, "tick", start));
        assert!(!sampler.should_sample_at(LogLevel::Info, "tick", start + Duration::from_millis(500)));
        assert!(!sampler.should_sample_at(LogLevel::Info, "tick", start + Duration::from_millis(999)));
        assert!(sampler.should_sample_at(LogLevel::Info, "tick", start + Duration::from_millis(1000)));
        assert!(!sampler.should_sample_at(LogLevel::Info, "tick", start + Duration::from_millis(1200)));
    }

    #[test]
    fn test_keys_are_level_and_message() {
        let sampler = LogSampler::new(SamplingPolicy::new(1, 0));
        let now = Instant::now();

        assert!(sampler.should_sample_at(LogLevel::Info, "a", now));
        assert!(sampler.should_sample_at(LogLevel::Warn, "a", now));
        assert!(sampler.should_sample_at(LogLevel::Info, "b", now));
        assert!(!sampler.should_sample_at(LogLevel::Info, "a", now));
    }

    #[test]
    fn test_disabled_policy_passes_everything() {
        let sampler = LogSampler::new(SamplingPolicy::new(0, 0));
        assert!((0..50).all(|_| sampler.should_sample(LogLevel::Debug, "same")));
        assert_eq!(sampler.metrics().dropped_count(), 0);
    }

    #[test]
    fn test_metrics_tracking() {
        let sampler = LogSampler::new(SamplingPolicy::new(2, 3));
        let now = Instant::now();
        for _ in 0..10 {
            sampler.should_sample_at(LogLevel::Info, "same", now);
        }

        let metrics = sampler.metrics();
        assert_eq!(metrics.total_count(), 10);
        assert_eq!(metrics.sampled_count(), 4);
        assert_eq!(metrics.dropped_count(), 6);
        assert!((metrics.effective_sample_rate() - 0.4).abs() < f64::EPSILON);

        metrics.reset();
        assert_eq!(metrics.total_count(), 0);
    }

    #[test]
    fn test_prunes_expired_counters() {
        let sampler = LogSampler::new(SamplingPolicy::new(1, 0));
        let start = Instant::now();
        for i in 0..PRUNE_THRESHOLD {
            sampler.should_sample_at(LogLevel::Info, &format!("msg {}", i), start);
        }

        let later = start + Duration::from_secs(2);
        assert!(sampler.should_sample_at(LogLevel::Info, "fresh", later));
        assert_eq!(sampler.counters[LogLevel::Info.as_u8() as usize].lock().len(), 1);
    }

    #[test]
    fn test_sampler_debug() {
        let sampler = LogSampler::new(SamplingPolicy::new(5, 5));
        let debug_str = format!("{:?}", sampler);
        assert!(debug_str.contains("LogSampler"));
        assert!(debug_str.contains("policy"));
    }
}
