//! # Scheduler core.
//!
//! - [`PollActor`](actor::PollActor): per-source state machine and timer.
//! - [`Poller`] / [`PollControl`]: user-facing handles.
//! - [`pollify`] / [`event_stream`]: factories that spawn and auto-start.

mod actor;
mod poller;
mod runner;
mod state;

pub use poller::{PollControl, Poller, event_stream, pollify};
pub use state::PollState;
