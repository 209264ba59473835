//! Fan-out over several sinks
//!
//! **Per-Sink Panic Isolation**: each sink call is wrapped in `catch_unwind`
//! so a failing destination never keeps an event from the others. Failures
//! are collected and returned together once every sink has been tried.

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::sink::Sink;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Routes every event to each enabled sink, in order
#[derive(Default)]
pub struct Tee {
    sinks: Vec<Box<dyn Sink>>,
    metrics: Option<Arc<LoggerMetrics>>,
}

impl Tee {
    pub fn new(sinks: Vec<Box<dyn Sink>>) -> Self {
        Self {
            sinks,
            metrics: None,
        }
    }

    /// Count every event that reaches the fan-out in `metrics`
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<LoggerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn push(&mut self, sink: Box<dyn Sink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Names of the sinks in routing order
    pub fn sink_names(&self) -> Vec<&str> {
        self.sinks.iter().map(|sink| sink.name()).collect()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn isolated(sink: &dyn Sink, op: impl FnOnce() -> Result<()>) -> Result<()> {
    match catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result,
        Err(payload) => Err(LoggerError::sink_panicked(sink.name(), panic_message(payload))),
    }
}

impl Sink for Tee {
    fn enabled(&self, level: LogLevel) -> bool {
        self.sinks.iter().any(|sink| sink.enabled(level))
    }

    fn write(&self, entry: &LogEntry) -> Result<()> {
        if let Some(ref metrics) = self.metrics {
            metrics.record_logged();
        }

        let errors: Vec<LoggerError> = self
            .sinks
            .iter()
            .filter(|sink| sink.enabled(entry.level))
            .filter_map(|sink| isolated(sink.as_ref(), || sink.write(entry)).err())
            .collect();

        LoggerError::aggregate(errors)
    }

    fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = isolated(sink.as_ref(), || sink.flush()) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn name(&self) -> &str {
        "tee"
    }
}
