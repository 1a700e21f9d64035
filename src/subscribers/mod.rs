//! # Out-of-band observers.
//!
//! - [`Subscribe`]: trait for lifecycle event observers.
//! - [`SubscriberSet`]: per-subscriber queues + workers with panic isolation.
//! - [`LogWriter`] (feature `logging`): stdout subscriber for demos.

mod set;
mod subscriber;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscriber::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
