//! # Synchronous listener registry.
//!
//! Data and error callbacks registered on a poller handle. Emission happens
//! inline on the scheduler's own task, before the next attempt is armed, so
//! a listener that calls `stop()` prevents re-arming.
//!
//! ## Rules
//! - Listeners fire in registration order.
//! - The registry is snapshotted before invoking, so a listener may register
//!   further listeners (or drop handles) without deadlocking.
//! - An error with no error listeners registered is dropped silently; it
//!   still reaches the event bus mirror.

use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

use crate::error::PollError;

pub(crate) type DataCallback<T> = std::sync::Arc<dyn Fn(&T, SystemTime) + Send + Sync>;
pub(crate) type ErrorCallback = std::sync::Arc<dyn Fn(&PollError) + Send + Sync>;

/// Registered `data`/`error` callbacks for one poller.
pub(crate) struct Listeners<T> {
    data: Mutex<Vec<DataCallback<T>>>,
    error: Mutex<Vec<ErrorCallback>>,
}

impl<T> Listeners<T> {
    pub(crate) fn new() -> Self {
        Self { data: Mutex::new(Vec::new()), error: Mutex::new(Vec::new()) }
    }

    pub(crate) fn on_data(&self, cb: DataCallback<T>) {
        lock_ignoring_poison(&self.data).push(cb);
    }

    pub(crate) fn on_error(&self, cb: ErrorCallback) {
        lock_ignoring_poison(&self.error).push(cb);
    }

    /// Invokes every data listener, in registration order.
    pub(crate) fn emit_data(&self, value: &T, at: SystemTime) {
        let snapshot: Vec<DataCallback<T>> = lock_ignoring_poison(&self.data).clone();
        for cb in snapshot {
            cb(value, at);
        }
    }

    /// Invokes every error listener, in registration order.
    pub(crate) fn emit_error(&self, error: &PollError) {
        let snapshot: Vec<ErrorCallback> = lock_ignoring_poison(&self.error).clone();
        for cb in snapshot {
            cb(error);
        }
    }
}

/// A panicking listener poisons the lock but must not disable the registry.
fn lock_ignoring_poison<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_emit_with_no_listeners_is_silent() {
        let listeners: Listeners<u32> = Listeners::new();
        listeners.emit_data(&1, SystemTime::now());
        listeners.emit_error(&PollError::fail("x"));
    }

    #[test]
    fn test_listeners_fire_in_registration_order() {
        let listeners: Listeners<u32> = Listeners::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            listeners.on_data(Arc::new(move |_, _| {
                order.lock().unwrap().push(tag);
            }));
        }

        listeners.emit_data(&0, SystemTime::now());
        assert_eq!(*order.lock().unwrap(), ["first", "second", "third"]);
    }

    #[test]
    fn test_data_and_error_registries_are_independent() {
        let listeners: Listeners<u32> = Listeners::new();
        let data_hits = Arc::new(AtomicUsize::new(0));
        let error_hits = Arc::new(AtomicUsize::new(0));

        {
            let data_hits = Arc::clone(&data_hits);
            listeners.on_data(Arc::new(move |_, _| {
                data_hits.fetch_add(1, Ordering::SeqCst);
            }));
        }
        {
            let error_hits = Arc::clone(&error_hits);
            listeners.on_error(Arc::new(move |_| {
                error_hits.fetch_add(1, Ordering::SeqCst);
            }));
        }

        listeners.emit_data(&5, SystemTime::now());
        assert_eq!(data_hits.load(Ordering::SeqCst), 1);
        assert_eq!(error_hits.load(Ordering::SeqCst), 0);

        listeners.emit_error(&PollError::fail("e"));
        assert_eq!(error_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_can_register_another_listener() {
        let registry: Arc<Listeners<u32>> = Arc::new(Listeners::new());
        let late_hits = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&registry);
        let hits = Arc::clone(&late_hits);
        registry.on_data(Arc::new(move |_, _| {
            let hits = Arc::clone(&hits);
            inner.on_data(Arc::new(move |_, _| {
                hits.fetch_add(1, Ordering::SeqCst);
            }));
        }));

        // Registration during emission must not deadlock and must not fire
        // the new listener for the in-progress emission.
        registry.emit_data(&1, SystemTime::now());
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        registry.emit_data(&2, SystemTime::now());
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }
}
