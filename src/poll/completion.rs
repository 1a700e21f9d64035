//! # Completion handle for callback-mode sources.
//!
//! A callback source receives a fresh [`Completion`] on every attempt and
//! settles it exactly once. Settling consumes the handle, so double
//! settlement is unrepresentable. The two degenerate endings differ:
//!
//! - handle **held** but never settled: the attempt stays in flight forever
//!   and the scheduler stalls (stopping remains possible);
//! - handle **dropped** unsettled: the attempt resolves to
//!   [`PollError::CompletionDropped`] and the cadence continues.

use tokio::sync::oneshot;

use crate::error::PollError;

/// One-shot settlement handle handed to a callback-mode source.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<Result<T, PollError>>,
}

impl<T> Completion<T> {
    /// Creates a handle and the receiver the adapter awaits.
    pub(crate) fn new() -> (Self, oneshot::Receiver<Result<T, PollError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Settles the attempt with a value.
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(Ok(value));
    }

    /// Settles the attempt with a failure.
    pub fn reject(self, error: impl Into<PollError>) {
        let _ = self.tx.send(Err(error.into()));
    }

    /// Settles the attempt with an already-formed result.
    pub fn settle(self, result: Result<T, PollError>) {
        let _ = self.tx.send(result);
    }
}
