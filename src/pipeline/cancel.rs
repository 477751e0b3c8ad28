//! Shared cancellation signal observed by every queue operation.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Cloneable cancel handle. Nothing is ever sent on `signal`; cancelling drops the only sender,
/// which disconnects the channel and wakes every `select!` waiting on it.
#[derive(Clone, Debug)]
pub struct CancelToken {
    signal: Receiver<()>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    cancelled: Arc<AtomicBool>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            signal: rx,
            trigger: Arc::new(Mutex::new(Some(tx))),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Fire the token. Idempotent; safe to call from a signal handler thread.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
        if let Ok(mut trigger) = self.trigger.lock() {
            trigger.take();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that becomes ready (disconnected) once the token fires. For use in `select!`.
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.signal
    }
}
