//! Distributed-trace identifiers
//!
//! The pipeline does not create spans; it only attaches identifiers supplied
//! by whatever tracing system the application runs.

use super::log_context::Fields;
use super::log_level::LogLevel;
use super::logger::Logger;
use serde::{Deserialize, Serialize};

/// Trace and span identifiers of the current operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
}

impl TraceContext {
    pub fn new(trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            parent_span_id: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_span_id: impl Into<String>) -> Self {
        self.parent_span_id = Some(parent_span_id.into());
        self
    }

    /// Both ids present and not all zeros
    pub fn is_valid(&self) -> bool {
        is_valid_id(&self.trace_id) && is_valid_id(&self.span_id)
    }

    /// The identifiers as `trace_id`, `span_id` and, if set, `parent_span_id`
    pub fn fields(&self) -> Fields {
        let mut fields = Fields::new()
            .with("trace_id", self.trace_id.as_str())
            .with("span_id", self.span_id.as_str());
        if let Some(ref parent) = self.parent_span_id {
            fields.add("parent_span_id", parent.as_str());
        }
        fields
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty() && id.chars().any(|c| c != '0')
}

/// Log `message` at info, prefixed with the trace identifiers when present
#[track_caller]
pub fn trace_event(logger: &Logger, trace: Option<&TraceContext>, message: &str, fields: impl Into<Fields>) {
    let fields = match trace {
        Some(trace) => trace.fields().merged(&fields.into()),
        None => fields.into(),
    };
    logger.log_with_fields(LogLevel::Info, message, fields);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::LoggerConfig;
    use crate::sinks::SharedBuffer;

    #[test]
    fn test_validity() {
        assert!(TraceContext::new("4bf92f3577b34da6a3ce929d0e0e4736", "00f067aa0ba902b7").is_valid());
        assert!(!TraceContext::new("", "00f067aa0ba902b7").is_valid());
        assert!(!TraceContext::new("00000000000000000000000000000000", "00f067aa0ba902b7").is_valid());
        assert!(!TraceContext::new("4bf92f3577b34da6", "0000000000000000").is_valid());
        assert!(!TraceContext::default().is_valid());
    }

    #[test]
    fn test_fields() {
        let trace = TraceContext::new("abc", "def").with_parent("123");
        let fields = trace.fields();
        let keys: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["trace_id", "span_id", "parent_span_id"]);
    }

    #[test]
    fn test_trace_event_and_with_trace() {
        let buffer = SharedBuffer::new();
        let config = LoggerConfig {
            output_paths: Vec::new(),
            sampling: None,
            ..LoggerConfig::default()
        };
        let logger = Logger::build(config, "svc", Some(Box::new(buffer.clone())));

        trace_event(&logger, Some(&TraceContext::new("abc", "def")), "step", Fields::new().with("n", 1));
        trace_event(&logger, None, "untraced", Fields::new());

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""trace_id":"abc""#));
        assert!(lines[0].contains(r#""span_id":"def""#));
        assert!(lines[0].contains(r#""n":1"#));
        assert!(!lines[1].contains("trace_id"));

        let unchanged = logger.with_trace(&TraceContext::default());
        assert!(unchanged.fields().get("trace_id").is_none());
        let traced = logger.with_trace(&TraceContext::new("abc", "def"));
        assert!(traced.fields().get("span_id").is_some());
    }
}
