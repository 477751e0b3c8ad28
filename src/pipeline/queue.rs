//! Bounded typed hand-off between exactly one producer stage and one consumer stage.

use crossbeam_channel::{Receiver, Sender, bounded, select};

use super::cancel::CancelToken;
use super::error_handler::PipelineError;

/// Producer end. Dropping it closes the queue.
pub struct Outbox<T> {
    tx: Sender<T>,
    cancel: CancelToken,
}

/// Consumer end.
pub struct Inbox<T> {
    rx: Receiver<T>,
    cancel: CancelToken,
}

/// Create a bounded FIFO queue of `capacity` items whose operations observe `cancel`.
/// A capacity of 0 is a rendezvous queue: every send waits for the matching receive.
pub fn queue<T>(capacity: usize, cancel: &CancelToken) -> (Outbox<T>, Inbox<T>) {
    let (tx, rx) = bounded(capacity);
    (
        Outbox {
            tx,
            cancel: cancel.clone(),
        },
        Inbox {
            rx,
            cancel: cancel.clone(),
        },
    )
}

impl<T> Outbox<T> {
    /// Blocks while the queue is full (back-pressure).
    /// Fails with `Cancelled` when the pipeline is cancelled, `Disconnected` if the consumer is gone.
    pub fn send(&self, item: T) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        select! {
            send(self.tx, item) -> res => res.map_err(|_| PipelineError::Disconnected),
            recv(self.cancel.signal()) -> _ => Err(PipelineError::Cancelled),
        }
    }
}

impl<T> Inbox<T> {
    /// Next item in FIFO order. `Ok(None)` once the producer has closed the queue and it is drained.
    pub fn recv(&self) -> Result<Option<T>, PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        select! {
            recv(self.rx) -> msg => match msg {
                Ok(item) => Ok(Some(item)),
                // A failing producer cancels before it closes; both may be ready at once.
                Err(_) if self.cancel.is_cancelled() => Err(PipelineError::Cancelled),
                Err(_) => Ok(None),
            },
            recv(self.cancel.signal()) -> _ => Err(PipelineError::Cancelled),
        }
    }

    /// Discard whatever is left until the queue closes. Returns items dropped, or the error
    /// that cut the drain short.
    pub(crate) fn drain(&self) -> Result<usize, PipelineError> {
        let mut dropped = 0_usize;
        while self.recv()?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }
}

/// Initial input of the first stage: closed and empty from the start.
pub(crate) fn closed_inbox(cancel: &CancelToken) -> Inbox<()> {
    let (tx, inbox) = queue::<()>(0, cancel);
    drop(tx);
    inbox
}
