//! Event encoders
//!
//! Two presets turn a [`LogEntry`] into one newline-terminated record:
//! - Console: human-readable, tab-separated, colorized level
//! - Json: one JSON object per line for ingestion pipelines
//!
//! Both render callers relative to the project root (see [`CallerLocation::render`]).
//!
//! [`CallerLocation::render`]: super::caller::CallerLocation::render

use super::error::Result;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::{duration_millis, format_duration, TimestampFormat};
use std::time::Duration;

/// Prefix given to user fields whose key collides with a record key
pub const COLLISION_PREFIX: &str = "fields.";

/// Escape the characters that would split a console record
///
/// Stops an embedded newline from forging a second record or a tab from
/// shifting columns.
fn escape_console(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Record layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderKind {
    /// `time<TAB>LEVEL<TAB>caller<TAB>message<TAB>{fields}`
    Console,
    /// `{"timestamp":..., "level":..., "message":..., ...fields}`
    Json,
}

/// How the level label is written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFormat {
    /// `INFO`, colorized when the `console` feature is enabled
    CapitalColor,
    /// `INFO`
    Capital,
    /// `info`
    Lowercase,
}

impl LevelFormat {
    fn render(&self, level: LogLevel) -> String {
        match self {
            LevelFormat::CapitalColor => colorize(level),
            LevelFormat::Capital => level.to_str().to_string(),
            LevelFormat::Lowercase => level.to_lowercase_str().to_string(),
        }
    }
}

#[cfg(feature = "console")]
fn colorize(level: LogLevel) -> String {
    use colored::Colorize;
    level.to_str().color(level.color_code()).to_string()
}

#[cfg(not(feature = "console"))]
fn colorize(level: LogLevel) -> String {
    level.to_str().to_string()
}

/// How duration field values are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFormat {
    /// `"1.5s"`
    String,
    /// `1500.0` (floating milliseconds)
    Millis,
}

impl DurationFormat {
    fn to_json_value(self, d: Duration) -> serde_json::Value {
        match self {
            DurationFormat::String => serde_json::Value::String(format_duration(d)),
            DurationFormat::Millis => serde_json::Number::from_f64(duration_millis(d))
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Keys and value renderings used by an encoder
///
/// An empty key omits that element from JSON records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    pub time_key: String,
    pub level_key: String,
    pub message_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub time_format: TimestampFormat,
    pub level_format: LevelFormat,
    pub duration_format: DurationFormat,
}

impl EncoderConfig {
    /// Human-readable preset
    pub fn console() -> Self {
        Self {
            time_key: "ts".to_string(),
            level_key: "level".to_string(),
            message_key: "msg".to_string(),
            caller_key: "caller".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            time_format: TimestampFormat::Iso8601,
            level_format: LevelFormat::CapitalColor,
            duration_format: DurationFormat::String,
        }
    }

    /// Machine-readable preset
    pub fn json() -> Self {
        Self {
            time_key: "timestamp".to_string(),
            level_key: "level".to_string(),
            message_key: "message".to_string(),
            caller_key: "caller".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            time_format: TimestampFormat::Rfc3339Nanos,
            level_format: LevelFormat::Lowercase,
            duration_format: DurationFormat::Millis,
        }
    }

    fn is_reserved(&self, key: &str) -> bool {
        [
            &self.time_key,
            &self.level_key,
            &self.message_key,
            &self.caller_key,
            &self.stacktrace_key,
        ]
        .iter()
        .any(|reserved| !reserved.is_empty() && reserved.as_str() == key)
    }
}

/// Converts one event into bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoder {
    kind: EncoderKind,
    config: EncoderConfig,
}

impl Encoder {
    pub fn new(kind: EncoderKind, config: EncoderConfig) -> Self {
        Self { kind, config }
    }

    /// Human-readable console preset
    pub fn console() -> Self {
        Self::new(EncoderKind::Console, EncoderConfig::console())
    }

    /// Console preset without color codes, for files and injected writers
    pub fn console_plain() -> Self {
        Self::new(
            EncoderKind::Console,
            EncoderConfig {
                level_format: LevelFormat::Capital,
                ..EncoderConfig::console()
            },
        )
    }

    /// Machine-readable JSON preset
    pub fn json() -> Self {
        Self::new(EncoderKind::Json, EncoderConfig::json())
    }

    pub fn kind(&self) -> EncoderKind {
        self.kind
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode an entry as one newline-terminated record
    pub fn encode(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        match self.kind {
            EncoderKind::Console => self.encode_console(entry),
            EncoderKind::Json => self.encode_json(entry),
        }
    }

    fn fields_object(&self, entry: &LogEntry) -> serde_json::Map<String, serde_json::Value> {
        let duration_format = self.config.duration_format;
        entry
            .fields
            .iter()
            .map(|field| {
                (
                    field.key.clone(),
                    field
                        .value
                        .to_json_value_with(|d| duration_format.to_json_value(d)),
                )
            })
            .collect()
    }

    fn encode_console(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let mut line = String::with_capacity(128);

        line.push_str(&self.config.time_format.format(&entry.timestamp));
        line.push('\t');
        line.push_str(&self.config.level_format.render(entry.level));

        if let Some(ref caller) = entry.caller {
            line.push('\t');
            line.push_str(&caller.render());
        }

        line.push('\t');
        line.push_str(&escape_console(&entry.message));

        if !entry.fields.is_empty() {
            let fields = serde_json::Value::Object(self.fields_object(entry));
            line.push('\t');
            line.push_str(&serde_json::to_string(&fields)?);
        }

        line.push('\n');

        if let Some(ref stacktrace) = entry.stacktrace {
            line.push_str(stacktrace.trim_end());
            line.push('\n');
        }

        Ok(line.into_bytes())
    }

    fn encode_json(&self, entry: &LogEntry) -> Result<Vec<u8>> {
        let config = &self.config;
        let mut record = serde_json::Map::new();

        if !config.time_key.is_empty() {
            record.insert(
                config.time_key.clone(),
                serde_json::Value::String(config.time_format.format(&entry.timestamp)),
            );
        }
        if !config.level_key.is_empty() {
            record.insert(
                config.level_key.clone(),
                serde_json::Value::String(config.level_format.render(entry.level)),
            );
        }
        if let (false, Some(caller)) = (config.caller_key.is_empty(), entry.caller.as_ref()) {
            record.insert(
                config.caller_key.clone(),
                serde_json::Value::String(caller.render()),
            );
        }
        if !config.message_key.is_empty() {
            record.insert(
                config.message_key.clone(),
                serde_json::Value::String(entry.message.clone()),
            );
        }
        if let (false, Some(stacktrace)) =
            (config.stacktrace_key.is_empty(), entry.stacktrace.as_ref())
        {
            record.insert(
                config.stacktrace_key.clone(),
                serde_json::Value::String(stacktrace.clone()),
            );
        }

        // Colliding fields are renamed after the others are placed, so a
        // renamed key never replaces a field the caller named explicitly
        let mut colliding = Vec::new();
        for (key, value) in self.fields_object(entry) {
            if config.is_reserved(&key) {
                colliding.push((key, value));
            } else {
                record.insert(key, value);
            }
        }
        for (key, value) in colliding {
            let mut key = format!("{}{}", COLLISION_PREFIX, key);
            while record.contains_key(&key) {
                key.insert_str(0, COLLISION_PREFIX);
            }
            record.insert(key, value);
        }

        let mut bytes = serde_json::to_vec(&serde_json::Value::Object(record))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
