//! Log entry structure

use super::caller::CallerLocation;
use super::log_context::{Field, Fields};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// One structured event, immutable once handed to the sinks
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: Fields,
    pub caller: Option<CallerLocation>,
    pub stacktrace: Option<String>,
}

impl LogEntry {
    /// The message is kept exactly as written; line-oriented encoders escape it
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            fields: Fields::new(),
            caller: None,
            stacktrace: None,
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    #[must_use]
    pub fn with_caller(mut self, caller: CallerLocation) -> Self {
        self.caller = Some(caller);
        self
    }

    #[must_use]
    pub fn with_stacktrace(mut self, stacktrace: impl Into<String>) -> Self {
        self.stacktrace = Some(stacktrace.into());
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
