//! # Event bus: broadcast fan-out for lifecycle events.
//!
//! Thin wrapper over [`tokio::sync::broadcast`]. Every subscriber gets its
//! own cursor into a shared ring; the scheduler publishes without awaiting.
//!
//! ## Rules
//! - [`publish`](Bus::publish) never blocks and never fails. With no active
//!   receivers the event is dropped on the floor.
//! - A slow receiver that falls more than `capacity` events behind observes
//!   [`RecvError::Lagged`](tokio::sync::broadcast::error::RecvError::Lagged)
//!   and loses the overwritten events, never the scheduler's cadence.
//! - Capacity is clamped to at least 1.

use tokio::sync::broadcast;

use crate::events::PollEvent;

/// Broadcast bus carrying [`PollEvent`]s to any number of observers.
pub struct Bus<T> {
    tx: broadcast::Sender<PollEvent<T>>,
}

impl<T> Clone for Bus<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> Bus<T>
where
    T: Clone + Send + 'static,
{
    /// Creates a bus with the given ring capacity (clamped to >= 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Opens a new subscription starting at the current position.
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent<T>> {
        self.tx.subscribe()
    }

    /// Publishes an event to all current subscribers. Fire-and-forget.
    pub fn publish(&self, event: PollEvent<T>) {
        let _ = self.tx.send(event);
    }

    /// Number of active subscriptions.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
