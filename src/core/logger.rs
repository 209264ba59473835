//! Pipeline handle
//!
//! A [`Logger`] is a cheap, clonable view over one assembled pipeline: the
//! root sink (a [`Tee`], possibly wrapped in a [`SampledSink`]), the shared
//! [`LevelController`], and a set of bound fields. Deriving a handle with
//! [`Logger::with_fields`] copies only the field set; the pipeline and its
//! level stay shared.
//!
//! # Example
//!
//! ```
//! use logpipe::sinks::SharedBuffer;
//! use logpipe::{LogLevel, Logger, LoggerConfig};
//!
//! let buffer = SharedBuffer::new();
//! let config = LoggerConfig {
//!     output_paths: Vec::new(),
//!     ..LoggerConfig::default()
//! };
//!
//! let logger = Logger::builder(config)
//!     .service("billing")
//!     .writer(Box::new(buffer.clone()))
//!     .build();
//!
//! let request = logger.with_field("request_id", "req-42");
//! request.info("charge accepted");
//! request.debug("not written at info");
//!
//! logger.set_level(LogLevel::Debug);
//! request.debug("written now");
//!
//! assert_eq!(buffer.lines().len(), 2);
//! ```

use super::call_context::CallContext;
use super::caller::CallerLocation;
use super::config::{LoggerConfig, STDERR, STDOUT};
use super::encoder::Encoder;
use super::error::{LoggerError, Result};
use super::level_controller::LevelController;
use super::log_context::{Field, FieldValue, Fields};
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::metrics::LoggerMetrics;
use super::registry;
use super::sampling::{LogSampler, SampledSink, SamplerMetrics};
use super::shutdown::ShutdownSignal;
use super::sink::Sink;
use super::tee::Tee;
use super::trace_context::TraceContext;
use crate::sinks::{open_destination, ConsoleSink, WriterSink};
use std::backtrace::Backtrace;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread;

/// Name of the thread waiting on a [`ShutdownSignal`]
pub const SHUTDOWN_WATCHER_THREAD: &str = "logpipe-shutdown";

/// Everything shared by a root handle and its derivatives
struct Pipeline {
    root: Box<dyn Sink>,
    level: LevelController,
    add_caller: bool,
    stacktrace_level: Option<LogLevel>,
    metrics: Arc<LoggerMetrics>,
    sampler: Option<Arc<LogSampler>>,
    closed: AtomicBool,
}

impl Pipeline {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn write(&self, entry: &LogEntry) {
        if let Err(e) = self.root.write(entry) {
            self.metrics.record_write_failure();
            eprintln!("[LOGGER ERROR] Failed to write log entry: {}", e);
        }
    }

    fn flush(&self) -> Result<()> {
        let result = self.root.flush();
        if result.is_err() {
            self.metrics.record_flush_failure();
        }
        result
    }

    /// One-shot: only the first caller flushes
    fn shutdown(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.flush()
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if !self.is_closed() {
            if let Err(e) = self.root.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            }
        }
    }
}

/// Handle to a logging pipeline
///
/// Cloning is cheap; every clone and every handle derived with `with_*`
/// writes through the same sinks and honors the same level.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Pipeline>,
    fields: Arc<Fields>,
}

impl Logger {
    /// Start building a pipeline from `config`
    #[must_use]
    pub fn builder(config: LoggerConfig) -> LoggerBuilder {
        LoggerBuilder::new(config)
    }

    /// Build a pipeline with `service` bound and an optional extra writer
    pub fn build(
        config: LoggerConfig,
        service: impl Into<String>,
        writer: Option<Box<dyn Write + Send>>,
    ) -> Logger {
        let builder = LoggerBuilder::new(config).service(service);
        match writer {
            Some(writer) => builder.writer(writer),
            None => builder,
        }
        .build()
    }

    /// Build a pipeline, flush it when `ctx` is cancelled, and make it the
    /// process default
    pub fn new(
        ctx: &CallContext,
        service: impl Into<String>,
        config: LoggerConfig,
        writer: Option<Box<dyn Write + Send>>,
    ) -> Logger {
        let (logger, _) = Self::new_with_level(ctx, service, config, writer);
        registry::register(logger.clone());
        logger
    }

    /// Like [`Logger::new`] without registering, returning the level handle
    pub fn new_with_level(
        ctx: &CallContext,
        service: impl Into<String>,
        config: LoggerConfig,
        writer: Option<Box<dyn Write + Send>>,
    ) -> (Logger, LevelController) {
        let mut builder = LoggerBuilder::new(config).service(service);
        if let Some(writer) = writer {
            builder = builder.writer(writer);
        }
        if let Some(signal) = ctx.shutdown_signal() {
            builder = builder.shutdown_on(signal.clone());
        }
        let logger = builder.build();
        let level = logger.level_controller();
        (logger, level)
    }

    /// A handle that discards everything
    pub fn nop() -> Logger {
        Logger {
            inner: Arc::new(Pipeline {
                root: Box::new(Tee::default()),
                level: LevelController::default(),
                add_caller: false,
                stacktrace_level: None,
                metrics: Arc::new(LoggerMetrics::new()),
                sampler: None,
                closed: AtomicBool::new(false),
            }),
            fields: Arc::new(Fields::new()),
        }
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(level, message.into(), Fields::new(), Location::caller());
    }

    /// Log with call-site fields; they override bound fields with the same key
    #[track_caller]
    pub fn log_with_fields(&self, level: LogLevel, message: impl Into<String>, fields: impl Into<Fields>) {
        self.emit(level, message.into(), fields.into(), Location::caller());
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.emit(LogLevel::Trace, message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message.into(), Fields::new(), Location::caller());
    }

    /// Logs at critical; the process keeps running
    #[track_caller]
    pub fn critical(&self, message: impl Into<String>) {
        self.emit(LogLevel::Critical, message.into(), Fields::new(), Location::caller());
    }

    /// Logs at fatal; the process keeps running
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.emit(LogLevel::Fatal, message.into(), Fields::new(), Location::caller());
    }

    fn emit(&self, level: LogLevel, message: String, fields: Fields, location: &Location<'_>) {
        let pipeline = &self.inner;
        if !pipeline.root.enabled(level) {
            return;
        }
        if pipeline.is_closed() {
            pipeline.metrics.record_after_shutdown();
            return;
        }

        let fields = if fields.is_empty() {
            (*self.fields).clone()
        } else {
            self.fields.merged(&fields)
        };

        let mut entry = LogEntry::new(level, message).with_fields(fields);
        if pipeline.add_caller {
            entry = entry.with_caller(CallerLocation::from_location(location));
        }
        if pipeline.stacktrace_level.is_some_and(|threshold| level >= threshold) {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }

        pipeline.write(&entry);
    }

    /// Derive a handle with extra bound fields; new values win on key collision
    #[must_use]
    pub fn with_fields(&self, fields: impl Into<Fields>) -> Logger {
        Logger {
            inner: Arc::clone(&self.inner),
            fields: Arc::new(self.fields.merged(&fields.into())),
        }
    }

    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Logger {
        self.with_fields(Field::new(key, value))
    }

    /// Derive a handle carrying `err` under the `error` key
    #[must_use]
    pub fn with_error<E: std::error::Error + ?Sized>(&self, err: &E) -> Logger {
        self.with_field("error", err.to_string())
    }

    /// Derive a handle carrying `trace_id` and `span_id`
    #[must_use]
    pub fn with_trace_context(&self, trace_id: impl Into<String>, span_id: impl Into<String>) -> Logger {
        let (trace_id, span_id): (String, String) = (trace_id.into(), span_id.into());
        self.with_fields(Fields::new().with("trace_id", trace_id).with("span_id", span_id))
    }

    /// Derive a handle from a trace context; invalid contexts leave it unchanged
    #[must_use]
    pub fn with_trace(&self, trace: &TraceContext) -> Logger {
        if !trace.is_valid() {
            return self.clone();
        }
        self.with_fields(trace.fields())
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn level(&self) -> LogLevel {
        self.inner.level.get()
    }

    /// Change the threshold for the whole pipeline, including every derived handle
    pub fn set_level(&self, level: LogLevel) {
        self.inner.level.set(level);
    }

    pub fn level_controller(&self) -> LevelController {
        self.inner.level.clone()
    }

    /// Whether an event at `level` would reach at least one sink
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.inner.root.enabled(level)
    }

    /// Flush every sink; the first failure is returned after all were tried
    pub fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    /// Flush once and stop accepting events
    ///
    /// Idempotent: later calls, including the shutdown watcher's, return
    /// `Ok(())` without flushing again. Events emitted afterwards are
    /// discarded silently.
    pub fn shutdown(&self) -> Result<()> {
        self.inner.shutdown()
    }

    pub fn is_shutdown(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.inner.metrics
    }

    /// Sampling counters, when sampling is active
    pub fn sampler_metrics(&self) -> Option<&SamplerMetrics> {
        self.inner.sampler.as_deref().map(LogSampler::metrics)
    }

    /// Whether two handles write through the same pipeline
    pub fn same_pipeline(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn watch(&self, signal: ShutdownSignal) {
        let pipeline: Weak<Pipeline> = Arc::downgrade(&self.inner);
        let spawned = thread::Builder::new()
            .name(SHUTDOWN_WATCHER_THREAD.to_string())
            .spawn(move || {
                signal.wait();
                if let Some(pipeline) = pipeline.upgrade() {
                    if let Err(e) = pipeline.shutdown() {
                        eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
                    }
                }
            });

        if let Err(e) = spawned {
            eprintln!(
                "[LOGGER WARNING] Could not start shutdown watcher: {}",
                LoggerError::io_operation("spawning thread", SHUTDOWN_WATCHER_THREAD, e)
            );
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::nop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("fields", &self.fields)
            .field("closed", &self.is_shutdown())
            .finish()
    }
}

/// Builder assembling a pipeline from a [`LoggerConfig`]
///
/// Destinations that cannot be opened are skipped; if none remain, the
/// pipeline writes to standard output. Construction never fails.
///
/// # Example
/// ```
/// use logpipe::{shutdown_channel, Environment, Logger, LoggerConfig};
///
/// let config = LoggerConfig {
///     environment: Environment::Prod,
///     export_path: Some("stderr".to_string()),
///     ..LoggerConfig::default()
/// };
///
/// let (trigger, signal) = shutdown_channel();
/// let logger = Logger::builder(config)
///     .service("ingest")
///     .shutdown_on(signal)
///     .build();
///
/// logger.info("started");
/// trigger.cancel();
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    service: Option<String>,
    writer: Option<Box<dyn Write + Send>>,
    shutdown: Option<ShutdownSignal>,
}

impl LoggerBuilder {
    pub fn new(config: LoggerConfig) -> Self {
        Self {
            config,
            service: None,
            writer: None,
            shutdown: None,
        }
    }

    /// Bind a `service` field to every event
    #[must_use = "builder methods return a new value"]
    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    /// Also write human-readable output to `writer`
    #[must_use = "builder methods return a new value"]
    pub fn writer(mut self, writer: Box<dyn Write + Send>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Flush and close the pipeline once `signal` fires
    #[must_use = "builder methods return a new value"]
    pub fn shutdown_on(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = Some(signal);
        self
    }

    pub fn build(self) -> Logger {
        let config = self.config;
        let level = LevelController::new(config.min_level());
        let metrics = Arc::new(LoggerMetrics::new());
        let mut tee = Tee::default().with_metrics(Arc::clone(&metrics));

        for destination in &config.output_paths {
            if let Some(sink) = open_destination(destination, human_encoder(destination), level.clone()) {
                tee.push(sink);
            }
        }

        if let Some(export) = config.effective_export_path() {
            if let Some(sink) = open_destination(export, Encoder::json(), level.clone()) {
                tee.push(sink);
            }
        }

        if let Some(writer) = self.writer {
            tee.push(Box::new(WriterSink::new(writer, Encoder::console_plain(), level.clone())));
        }

        if tee.is_empty() {
            tee.push(Box::new(ConsoleSink::stdout(Encoder::console(), level.clone())));
        }

        let (root, sampler) = match config.effective_sampling() {
            Some(policy) => {
                let sampler = Arc::new(LogSampler::new(policy));
                let sampled = SampledSink::new(Box::new(tee), Arc::clone(&sampler));
                (Box::new(sampled) as Box<dyn Sink>, Some(sampler))
            }
            None => (Box::new(tee) as Box<dyn Sink>, None),
        };

        let mut fields = Fields::new();
        if let Some(service) = self.service {
            fields.add("service", service);
        }

        let logger = Logger {
            inner: Arc::new(Pipeline {
                root,
                level,
                add_caller: !config.disable_caller,
                stacktrace_level: config.stacktrace_threshold(),
                metrics,
                sampler,
                closed: AtomicBool::new(false),
            }),
            fields: Arc::new(fields),
        };

        if let Some(signal) = self.shutdown {
            logger.watch(signal);
        }

        logger
    }
}

/// Colors only make sense on a terminal stream
fn human_encoder(destination: &str) -> Encoder {
    match destination {
        STDOUT | STDERR => Encoder::console(),
        _ => Encoder::console_plain(),
    }
}
