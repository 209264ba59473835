//! Sink trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

/// A destination paired with an encoder and a level threshold
///
/// Sinks are shared across threads, so implementations serialize their own
/// write path; one `write` call must land as one uninterrupted record.
pub trait Sink: Send + Sync {
    /// Whether an event at `level` would be accepted
    fn enabled(&self, level: LogLevel) -> bool;

    /// Encode and write one entry
    fn write(&self, entry: &LogEntry) -> Result<()>;

    /// Push buffered output to its destination
    fn flush(&self) -> Result<()>;

    fn name(&self) -> &str;
}
