//! Cancellation signal for the shutdown watcher
//!
//! The sending half of a crossbeam channel that never carries a message is
//! shared by a [`ShutdownTrigger`] and its [`ShutdownSignal`]s. Only
//! [`ShutdownTrigger::cancel`] drops it; the resulting disconnect wakes every
//! signal blocked in [`ShutdownSignal::wait`]. Dropping the trigger without
//! cancelling leaves the signals pending forever.

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct Shared {
    sender: Mutex<Option<Sender<()>>>,
    cancelled: AtomicBool,
}

/// Create a linked trigger/signal pair
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (sender, receiver) = bounded::<()>(0);
    let shared = Arc::new(Shared {
        sender: Mutex::new(Some(sender)),
        cancelled: AtomicBool::new(false),
    });
    (
        ShutdownTrigger {
            shared: Arc::clone(&shared),
        },
        ShutdownSignal { receiver, shared },
    )
}

/// Cancels the paired [`ShutdownSignal`]s
#[derive(Debug)]
pub struct ShutdownTrigger {
    shared: Arc<Shared>,
}

impl ShutdownTrigger {
    /// Fire the signal; calling it again has no effect
    pub fn cancel(&self) {
        self.shared.cancelled.store(true, Ordering::Release);
        drop(self.shared.sender.lock().take());
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}

/// Observes cancellation of the paired [`ShutdownTrigger`]
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    receiver: Receiver<()>,
    shared: Arc<Shared>,
}

impl ShutdownSignal {
    /// Block until the trigger is cancelled
    pub fn wait(&self) {
        // Nothing is ever sent, so recv only returns once the sender is gone
        while self.receiver.recv().is_ok() {}
    }

    /// Block for at most `timeout`; returns whether the signal fired
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) | Ok(()) => self.is_cancelled(),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.shared.cancelled.load(Ordering::Acquire)
    }
}
