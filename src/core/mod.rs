//! Core pipeline types and traits

pub mod call_context;
pub mod caller;
pub mod config;
pub mod encoder;
pub mod error;
pub mod level_controller;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod sampling;
pub mod shutdown;
pub mod sink;
pub mod tee;
pub mod timestamp;
pub mod trace_context;

pub use call_context::{attach, from_context, CallContext};
pub use caller::CallerLocation;
pub use config::{Environment, LoggerConfig, STDERR, STDOUT};
pub use encoder::{DurationFormat, Encoder, EncoderConfig, EncoderKind, LevelFormat};
pub use error::{LoggerError, Result};
pub use level_controller::LevelController;
pub use log_context::{Field, FieldValue, Fields};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use registry::{global, global_level, register, reset_global, set_global_level};
pub use sampling::{LogSampler, SampledSink, SamplerMetrics, SamplingPolicy};
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use sink::Sink;
pub use tee::Tee;
pub use timestamp::TimestampFormat;
pub use trace_context::{trace_event, TraceContext};
