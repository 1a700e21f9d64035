//! # Run a single poll attempt.
//!
//! Executes one attempt of a [`PollSource`], hands the outcome to the
//! synchronous listeners, and mirrors it onto the event bus.
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   source.attempt() → Ok(value)  → listeners (data) → bus Data mirror
//!
//! Failure:
//!   source.attempt() → Err(e)     → listeners (error) → bus Error mirror
//!
//! Panic:
//!   source.attempt() → panic      → caught, rendered as PollError::Panicked
//!                                 → listeners (error) → bus Error mirror
//! ```
//!
//! ## Rules
//! - Always emits **exactly one** of `data` / `error` per attempt
//! - Listeners run **before** the bus mirror and before the caller re-arms,
//!   so a listener's `stop()` is observed ahead of the next schedule
//! - A panic is contained at this boundary and never unwinds into the
//!   scheduler loop

use std::sync::Arc;
use std::time::SystemTime;

use futures::FutureExt;

use crate::{
    error::{PollError, panic_message},
    events::{Bus, Listeners, PollEvent, PollEventKind},
    poll::PollSource,
};

/// Executes a single attempt of `source` and performs both emissions.
///
/// ### Flow
/// 1. Publish `TickStarted` on the bus
/// 2. Run the attempt inside a panic guard
/// 3. Invoke listeners synchronously with the outcome
/// 4. Publish the `Data`/`Error` mirror carrying the same timestamp
pub(crate) async fn run_once<T>(
    source: &dyn PollSource<T>,
    tick: u64,
    listeners: &Listeners<T>,
    bus: &Bus<T>,
    name: &Arc<str>,
) where
    T: Clone + Send + 'static,
{
    bus.publish(PollEvent::now(name, PollEventKind::TickStarted).with_tick(tick));

    let outcome = match std::panic::AssertUnwindSafe(source.attempt()).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(PollError::Panicked { detail: panic_message(payload) }),
    };

    let at = SystemTime::now();
    match outcome {
        Ok(value) => {
            listeners.emit_data(&value, at);
            bus.publish(PollEvent::stamped(at, name, PollEventKind::Data(value)).with_tick(tick));
        }
        Err(error) => {
            listeners.emit_error(&error);
            bus.publish(PollEvent::stamped(at, name, PollEventKind::Error(error)).with_tick(tick));
        }
    }
}
