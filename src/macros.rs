//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. A braced
//! `{ key => value, ... }` block before the message attaches call-site fields.
//! The recorded caller is the macro's call site.
//!
//! # Examples
//!
//! ```
//! use logpipe::{info, warn, Logger};
//!
//! let logger = Logger::nop();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, { "attempt" => 3, "max" => 5 }, "Retrying {}", "upload");
//! ```

/// Build a [`Fields`](crate::Fields) set from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use logpipe::fields;
///
/// let fields = fields! { "user_id" => 42, "active" => true };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::Fields::new()$(.with($key, $value))+
    };
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use logpipe::{LogLevel, Logger};
/// # let logger = Logger::nop();
/// use logpipe::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, { "code" => 429 }, "Throttled");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.log_with_fields($level, format!($($arg)+), $crate::fields!($($key => $value),*))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use logpipe::{LogLevel, Logger};
/// # let logger = Logger::nop();
/// # logger.set_level(LogLevel::Trace);
/// use logpipe::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use logpipe::Logger;
/// # let logger = Logger::nop();
/// use logpipe::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use logpipe::Logger;
/// # let logger = Logger::nop();
/// use logpipe::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, { "db" => "orders" }, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message. The process keeps running.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}

/// Log a fatal-level message. The process keeps running.
///
/// # Examples
///
/// ```
/// # use logpipe::Logger;
/// # let logger = Logger::nop();
/// use logpipe::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
