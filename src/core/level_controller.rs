//! Shared, runtime-adjustable minimum level
//!
//! One controller is created per pipeline and cloned into every sink, so a
//! single `set` is observed by all destinations and every derived handle at
//! once. The level lives in an `AtomicU8`; reads never block writers.

use super::log_level::LogLevel;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Severity threshold shared by reference across a whole pipeline
///
/// # Example
///
/// ```
/// use logpipe::{LevelController, LogLevel};
///
/// let level = LevelController::new(LogLevel::Info);
/// let shared = level.clone();
///
/// shared.set(LogLevel::Debug);
/// assert_eq!(level.get(), LogLevel::Debug);
/// assert!(level.enabled(LogLevel::Debug));
/// ```
#[derive(Clone)]
pub struct LevelController {
    level: Arc<AtomicU8>,
}

impl LevelController {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level: Arc::new(AtomicU8::new(level.as_u8())),
        }
    }

    #[inline]
    pub fn get(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Acquire))
    }

    #[inline]
    pub fn set(&self, level: LogLevel) {
        self.level.store(level.as_u8(), Ordering::Release);
    }

    /// Set from a level name; unknown names select `Info`
    pub fn set_from_str(&self, level: &str) {
        self.set(LogLevel::parse_or_default(level));
    }

    /// Whether an event at `level` passes the current threshold
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.get()
    }

    /// Whether two controllers are the same shared value
    pub fn same_as(&self, other: &LevelController) -> bool {
        Arc::ptr_eq(&self.level, &other.level)
    }
}

impl Default for LevelController {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl fmt::Debug for LevelController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LevelController").field(&self.get()).finish()
    }
}
