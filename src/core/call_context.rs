//! Call-scoped logger carrier
//!
//! A [`CallContext`] is passed explicitly down a call chain. It may carry a
//! logger that overrides the process default for that chain, and the
//! shutdown signal the chain's pipeline should honor.
//!
//! # Example
//!
//! ```
//! use logpipe::{CallContext, Logger};
//!
//! fn handle(ctx: &CallContext) {
//!     ctx.logger().info("handling request");
//! }
//!
//! let request_logger = Logger::nop().with_field("request_id", "r-1");
//! let ctx = CallContext::background().with_logger(request_logger);
//! handle(&ctx);
//! ```

use super::logger::Logger;
use super::registry;
use super::shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    logger: Option<Logger>,
    shutdown: Option<ShutdownSignal>,
}

impl CallContext {
    /// Empty context: no logger override, never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Child context that is cancelled through the returned trigger
    pub fn with_shutdown(&self) -> (CallContext, ShutdownTrigger) {
        let (trigger, signal) = shutdown_channel();
        (
            CallContext {
                logger: self.logger.clone(),
                shutdown: Some(signal),
            },
            trigger,
        )
    }

    /// Child context carrying an existing signal
    #[must_use]
    pub fn with_signal(&self, signal: ShutdownSignal) -> CallContext {
        CallContext {
            logger: self.logger.clone(),
            shutdown: Some(signal),
        }
    }

    /// Child context whose chain logs through `logger`
    #[must_use]
    pub fn with_logger(&self, logger: Logger) -> CallContext {
        CallContext {
            logger: Some(logger),
            shutdown: self.shutdown.clone(),
        }
    }

    /// The attached logger, else the process default, else a no-op logger
    pub fn logger(&self) -> Logger {
        match self.logger {
            Some(ref logger) => logger.clone(),
            None => registry::global(),
        }
    }

    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    pub fn shutdown_signal(&self) -> Option<&ShutdownSignal> {
        self.shutdown.as_ref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.shutdown.as_ref().is_some_and(ShutdownSignal::is_cancelled)
    }
}

/// Attach `logger` to a copy of `ctx`
pub fn attach(ctx: &CallContext, logger: Logger) -> CallContext {
    ctx.with_logger(logger)
}

/// Logger for `ctx`, falling back to the process default
pub fn from_context(ctx: &CallContext) -> Logger {
    ctx.logger()
}
