//! Shutdown coordination
//!
//! A cloneable handle that every long-running thread watches. Triggering it
//! drops the only sender of a crossbeam channel, so every receiver observes
//! disconnection at once, including threads parked in `select!`.

use std::sync::Arc;
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::Mutex;

/// Shutdown coordinator
#[derive(Debug, Clone)]
pub struct Shutdown {
    sender: Arc<Mutex<Option<Sender<()>>>>,
    receiver: Receiver<()>,
}

impl Shutdown {
    /// Create a handle that has not been triggered
    pub fn new() -> Self {
        let (sender, receiver) = channel::bounded(0);
        Self {
            sender: Arc::new(Mutex::new(Some(sender))),
            receiver,
        }
    }

    /// Initiate shutdown; later calls are no-ops
    pub fn trigger(&self) {
        if self.sender.lock().take().is_some() {
            tracing::info!("Shutdown requested");
        }
    }

    /// Check if shutdown has been triggered
    pub fn is_triggered(&self) -> bool {
        matches!(self.receiver.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Block for at most `timeout`; returns true if shutdown was triggered
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        matches!(
            self.receiver.recv_timeout(timeout),
            Err(RecvTimeoutError::Disconnected)
        )
    }

    /// Receiver for use in `select!`; it disconnects on shutdown
    pub fn receiver(&self) -> &Receiver<()> {
        &self.receiver
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
