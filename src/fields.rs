//! Field constructors with the key names used across services
//!
//! Using these instead of ad-hoc keys keeps records from different
//! components queryable with the same names.
//!
//! ```
//! use logpipe::fields;
//! use logpipe::Fields;
//! use std::time::Duration;
//!
//! let request: Fields = vec![
//!     fields::request_id("req-7"),
//!     fields::http_method("GET"),
//!     fields::http_status(200),
//!     fields::latency(Duration::from_millis(12)),
//! ]
//! .into();
//!
//! assert_eq!(request.len(), 4);
//! ```

use crate::core::timestamp::duration_millis;
use crate::core::Field;
use std::time::Duration;

// HTTP request

pub fn request_id(id: &str) -> Field {
    Field::new("request_id", id)
}

pub fn http_method(method: &str) -> Field {
    Field::new("http_method", method)
}

pub fn http_path(path: &str) -> Field {
    Field::new("http_path", path)
}

pub fn http_status(code: u16) -> Field {
    Field::new("http_status", code)
}

pub fn latency(d: Duration) -> Field {
    Field::new("latency", d)
}

/// Latency as floating milliseconds, for backends that cannot parse durations
pub fn latency_ms(d: Duration) -> Field {
    Field::new("latency_ms", duration_millis(d))
}

pub fn client_ip(ip: &str) -> Field {
    Field::new("client_ip", ip)
}

pub fn user_agent(ua: &str) -> Field {
    Field::new("user_agent", ua)
}

pub fn request_size(size: u64) -> Field {
    Field::new("request_size", size)
}

pub fn response_size(size: u64) -> Field {
    Field::new("response_size", size)
}

// Tracing

pub fn trace_id(id: &str) -> Field {
    Field::new("trace_id", id)
}

pub fn span_id(id: &str) -> Field {
    Field::new("span_id", id)
}

pub fn parent_span_id(id: &str) -> Field {
    Field::new("parent_span_id", id)
}

// Identity

pub fn user_id(id: &str) -> Field {
    Field::new("user_id", id)
}

pub fn tenant_id(id: &str) -> Field {
    Field::new("tenant_id", id)
}

pub fn session_id(id: &str) -> Field {
    Field::new("session_id", id)
}

// Errors

pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Field {
    Field::new("error", err.to_string())
}

/// Type name of the error, e.g. `std::io::error::Error`
pub fn error_type<E: ?Sized>(_err: &E) -> Field {
    Field::new("error_type", std::any::type_name::<E>())
}

pub fn error_code(code: &str) -> Field {
    Field::new("error_code", code)
}

// Database

pub fn db_operation(op: &str) -> Field {
    Field::new("db_operation", op)
}

pub fn db_table(table: &str) -> Field {
    Field::new("db_table", table)
}

pub fn db_duration(d: Duration) -> Field {
    Field::new("db_duration", d)
}

pub fn rows_affected(n: u64) -> Field {
    Field::new("rows_affected", n)
}

// Cache

pub fn cache_hit(hit: bool) -> Field {
    Field::new("cache_hit", hit)
}

pub fn cache_key(key: &str) -> Field {
    Field::new("cache_key", key)
}

// Messaging

pub fn queue_name(name: &str) -> Field {
    Field::new("queue_name", name)
}

pub fn message_id(id: &str) -> Field {
    Field::new("message_id", id)
}

// gRPC

pub fn grpc_method(method: &str) -> Field {
    Field::new("grpc_method", method)
}

pub fn grpc_service(service: &str) -> Field {
    Field::new("grpc_service", service)
}

pub fn grpc_code(code: &str) -> Field {
    Field::new("grpc_code", code)
}

// Service metadata

pub fn component(name: &str) -> Field {
    Field::new("component", name)
}

pub fn operation(name: &str) -> Field {
    Field::new("operation", name)
}

pub fn version(v: &str) -> Field {
    Field::new("version", v)
}

pub fn environment(env: &str) -> Field {
    Field::new("environment", env)
}
