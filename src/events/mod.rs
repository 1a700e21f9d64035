//! # Event surface.
//!
//! Two complementary halves:
//!
//! - [`Listeners`]: the synchronous `data`/`error` callbacks registered on a
//!   poller handle. Invoked inline before the scheduler re-arms.
//! - [`Bus`] + [`PollEvent`]: asynchronous broadcast of the full lifecycle
//!   (started, tick, data/error mirrors, stopped) for observers.

mod bus;
mod event;
mod listeners;

pub use bus::Bus;
pub use event::{PollEvent, PollEventKind};

pub(crate) use listeners::Listeners;
