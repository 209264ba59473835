//! Process-wide default logger
//!
//! Holds at most one registered [`Logger`]. Until something registers, or
//! after [`reset_global`], [`global`] hands out a no-op logger so early code
//! can log without checking.

use super::level_controller::LevelController;
use super::log_level::LogLevel;
use super::logger::Logger;
use parking_lot::{const_rwlock, RwLock};

static GLOBAL: RwLock<Option<Logger>> = const_rwlock(None);

/// Replace the process default; the last call wins
pub fn register(logger: Logger) {
    *GLOBAL.write() = Some(logger);
}

/// The registered logger, or a no-op logger
pub fn global() -> Logger {
    GLOBAL.read().clone().unwrap_or_else(Logger::nop)
}

/// Remove the registered logger, returning it
pub fn reset_global() -> Option<Logger> {
    GLOBAL.write().take()
}

pub fn is_registered() -> bool {
    GLOBAL.read().is_some()
}

/// Level controller of the process default
pub fn global_level() -> LevelController {
    global().level_controller()
}

/// Change the level of the process default; unknown names select `info`
pub fn set_global_level(level: &str) {
    if let Some(ref logger) = *GLOBAL.read() {
        logger.set_level(LogLevel::parse_or_default(level));
    }
}
