//! # pollify
//!
//! **Pollify** turns any function into a recurring, controllable polling
//! source that emits `data` and `error` events.
//!
//! Hand it a closure in any of three calling conventions (plain return,
//! callback, future), a rate, and it produces a running [`Poller`]: a
//! scheduler that repeatedly invokes the closure, never overlaps attempts,
//! survives failures and panics, and can be stopped and restarted at will.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  PollConfig + PollFn (return | callback | promise)
//!         │
//!         ▼  pollify() / event_stream()       (auto-start)
//!  ┌──────────────────────────────────────────────┐
//!  │ Poller (clonable handle)                     │
//!  │  - on_data / on_error listeners (sync)       │
//!  │  - start() / stop() (idempotent)             │
//!  │  - subscribe() ─► lifecycle bus              │
//!  │  - control()   ─► weak PollControl           │
//!  └──────┬───────────────────────────────────────┘
//!         │ commands (mpsc)        state (watch)
//!         ▼
//!  ┌──────────────────────────────────────────────┐
//!  │ PollActor (one task per poller)              │
//!  │                                              │
//!  │  Stopped ──► Scheduled ──► InFlight ──┐      │
//!  │     ▲            ▲                    │      │
//!  │     │            └───── re-arm ───────┤      │
//!  │     └────────── stop ─────────────────┘      │
//!  └──────┬───────────────────────────────────────┘
//!         │ publishes PollEvent
//!         ▼
//!    Bus (broadcast) ──► SubscriberSet (queues + workers)
//! ```
//!
//! ### Lifecycle
//! ```text
//! pollify(config, source) ──► PollActor::run()
//!
//! loop {
//!   ├─► await Start            (the factory sends one immediately)
//!   ├─► publish Started
//!   └─► loop {
//!         ├─► sleep(rate)      Start → absorbed, Stop → disarm
//!         ├─► tick += 1, publish TickStarted
//!         ├─► attempt (panic-guarded, runs to completion)
//!         │     ├─ Ok(v)  ─► data listeners → Data mirror
//!         │     └─ Err(e) ─► error listeners → Error mirror
//!         └─► honor stops seen meanwhile, else re-arm
//!       }
//! }
//! ```
//!
//! ## Features
//! | Area            | Description                                                          | Key types / traits                     |
//! |-----------------|----------------------------------------------------------------------|----------------------------------------|
//! | **Sources**     | Build pollable sources from closures in any calling convention.      | [`PollFn`], [`PollSource`], [`Completion`] |
//! | **Scheduling**  | Serialized attempts with a completion-to-start rate.                 | [`Poller`], [`PollConfig`]             |
//! | **Control**     | Idempotent start/stop; weak handles safe to capture in listeners.    | [`PollControl`], [`PollState`]         |
//! | **Events**      | Synchronous `data`/`error` listeners plus a lifecycle broadcast bus. | [`PollEvent`], [`PollEventKind`], [`Bus`] |
//! | **Subscribers** | Out-of-band observers with bounded queues and panic isolation.       | [`Subscribe`], [`SubscriberSet`]       |
//! | **Errors**      | Typed construction and per-attempt errors.                           | [`ConfigError`], [`PollError`]         |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::time::Duration;
//! use pollify::{Mode, PollConfig, PollFn, pollify};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), pollify::ConfigError> {
//!     let ticks = Arc::new(AtomicU64::new(0));
//!     let counter = Arc::clone(&ticks);
//!
//!     // The closure's captures are replayed on every attempt.
//!     let source = PollFn::returning("counter", move || {
//!         Ok(counter.fetch_add(1, Ordering::Relaxed))
//!     });
//!
//!     // The poller starts immediately; the first attempt runs one rate later.
//!     let poller = pollify(PollConfig::new(Duration::from_millis(10), Mode::Return), source)?;
//!     poller.on_data(|value, _at| println!("tick #{value}"));
//!
//!     tokio::time::sleep(Duration::from_millis(55)).await;
//!     poller.stop();
//!     Ok(())
//! }
//! ```
mod config;
mod core;
mod error;
mod events;
mod poll;
mod subscribers;

// ---- Public re-exports ----

pub use config::{DEFAULT_BUS_CAPACITY, PollConfig};
pub use core::{PollControl, PollState, Poller, event_stream, pollify};
pub use error::{ConfigError, PollError};
pub use events::{Bus, PollEvent, PollEventKind};
pub use poll::{BoxPollFuture, Completion, Mode, PollFn, PollSource, SourceRef};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
