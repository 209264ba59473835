//! # logpipe
//!
//! Structured logging pipeline: one declarative configuration becomes a
//! fan-out of human-readable and machine-readable destinations sharing a
//! runtime-adjustable level, with duplicate suppression in front.
//!
//! ## Features
//!
//! - **Shared Dynamic Level**: one `set_level` reaches every sink and every derived handle
//! - **Multiple Destinations**: standard streams, append-only files, and injected writers
//! - **Sampling**: per `(level, message)` limits within a one-second window
//! - **Failure Isolation**: a broken destination never silences the others
//! - **Context Propagation**: process-wide default plus explicit call-scoped override
//!
//! ## Quick Start
//!
//! ```
//! use logpipe::prelude::*;
//!
//! let (ctx, trigger) = CallContext::background().with_shutdown();
//! let logger = Logger::new(&ctx, "checkout", LoggerConfig::default(), None);
//!
//! logger
//!     .with_field("order_id", 1017)
//!     .info("order placed");
//!
//! set_global_level("debug");
//! global().debug("visible through the process default");
//!
//! // Flushes the pipeline once
//! trigger.cancel();
//! ```

pub mod core;
pub mod fields;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        attach, from_context, global, global_level, register, reset_global, set_global_level,
        shutdown_channel, trace_event, CallContext, Environment, Field, FieldValue, Fields,
        LevelController, LogLevel, Logger, LoggerBuilder, LoggerConfig, LoggerError,
        LoggerMetrics, Result, SamplingPolicy, ShutdownSignal, ShutdownTrigger, Sink,
        TraceContext,
    };
    pub use crate::sinks::SharedBuffer;
}

pub use crate::core::{
    attach, from_context, global, global_level, register, reset_global, set_global_level,
    shutdown_channel, trace_event, CallContext, CallerLocation, DurationFormat, Encoder,
    EncoderConfig, EncoderKind, Environment, Field, FieldValue, Fields, LevelController,
    LevelFormat, LogEntry, LogLevel, LogSampler, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, Result, SampledSink, SamplerMetrics, SamplingPolicy,
    ShutdownSignal, ShutdownTrigger, Sink, Tee, TimestampFormat, TraceContext,
};
