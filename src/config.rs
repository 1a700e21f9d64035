//! # Poller configuration.
//!
//! Two knobs matter: the polling [`rate`](PollConfig::rate) and the declared
//! [`mode`](PollConfig::mode). The rate is measured from the completion of
//! one attempt to the start of the next, so a slow source never compresses
//! the gap between attempts. The mode must agree with the source's calling
//! convention; the factory rejects the pair otherwise.

use std::time::Duration;

use crate::poll::Mode;

/// Default capacity for the broadcast event bus.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Configuration for a single poller.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Delay between the completion of one attempt and the start of the next.
    pub rate: Duration,
    /// Calling convention the source must follow.
    pub mode: Mode,
    /// Ring capacity of the lifecycle event bus (clamped to at least 1).
    pub bus_capacity: usize,
}

impl PollConfig {
    /// Creates a configuration with the default bus capacity.
    pub fn new(rate: Duration, mode: Mode) -> Self {
        Self { rate, mode, bus_capacity: DEFAULT_BUS_CAPACITY }
    }

    /// Overrides the event bus capacity.
    pub fn with_bus_capacity(mut self, capacity: usize) -> Self {
        self.bus_capacity = capacity;
        self
    }

    /// Bus capacity with the zero case clamped away.
    pub(crate) fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}
