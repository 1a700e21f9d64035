//! # Scheduler states and control commands.

/// Observable state of one poll scheduler.
///
/// Transitions:
/// ```text
/// Stopped ──start──► Scheduled ──rate elapsed──► InFlight
///    ▲                   ▲                           │
///    │                   └────────re-arm─────────────┤
///    └──────────stop (or all handles dropped)────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No timer armed, no attempt running.
    Stopped,
    /// A timer is armed for the next attempt.
    Scheduled,
    /// An attempt is currently running. It always runs to completion;
    /// a stop request is honored right after, instead of re-arming.
    InFlight,
}

impl PollState {
    /// True unless the scheduler is fully stopped.
    pub fn is_active(self) -> bool {
        !matches!(self, PollState::Stopped)
    }

    /// Stable identifier for logs.
    pub fn as_label(self) -> &'static str {
        match self {
            PollState::Stopped => "stopped",
            PollState::Scheduled => "scheduled",
            PollState::InFlight => "in_flight",
        }
    }
}

/// Control requests accepted by the scheduler.
///
/// Both are idempotent: redundant requests are absorbed without observable
/// effect on cadence or emissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Command {
    Start,
    Stop,
}
