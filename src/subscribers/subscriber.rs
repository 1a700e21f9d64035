//! # Lifecycle event subscriber trait.
//!
//! Provides [`Subscribe`], the extension point for plugging custom observers
//! into a poller's event bus.
//!
//! Each subscriber gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-subscriber bounded queue** (capacity via [`Subscribe::queue_capacity`])
//! - **Panic isolation** (a panicking subscriber never affects the scheduler)
//!
//! ## Architecture
//! ```text
//! Bus ──► pump ──► SubscriberSet ──► [bounded queue] ──► worker ──► on_event()
//! ```
//!
//! ## Rules
//! - A slow subscriber only affects its own queue.
//! - Queue overflow drops the event **for this subscriber only**; the
//!   scheduler's cadence and the synchronous listeners are unaffected.
//! - Events are processed sequentially (FIFO) per subscriber.
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use pollify::{PollEvent, Subscribe};
//!
//! struct ErrorCounter;
//!
//! #[async_trait]
//! impl Subscribe<u64> for ErrorCounter {
//!     async fn on_event(&self, event: &PollEvent<u64>) {
//!         if event.kind.is_error() {
//!             // bump a metric, push an alert, ...
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "error-counter" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::PollEvent;

/// Out-of-band observer of poll lifecycle events.
///
/// Unlike the synchronous `data`/`error` listeners, subscribers run on their
/// own worker tasks and never delay the scheduler.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; panics are caught but cost the event.
#[async_trait]
pub trait Subscribe<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Processes a single event.
    ///
    /// Called from a dedicated worker task, never in the scheduler context.
    /// Events arrive in FIFO order per subscriber.
    async fn on_event(&self, event: &PollEvent<T>);

    /// Name used in drop/panic diagnostics.
    ///
    /// Prefer short, descriptive names (e.g. "metrics", "audit"). The default
    /// uses `type_name::<Self>()`, which can be verbose.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred queue capacity for this subscriber (clamped to >= 1).
    ///
    /// When the queue is full the newest event is dropped for this
    /// subscriber only.
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
