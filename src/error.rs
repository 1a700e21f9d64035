//! # Error types.
//!
//! Split in two layers:
//!
//! - [`ConfigError`]: construction-time failures. Raised once, before any
//!   polling starts, and never exposed through the event surface.
//! - [`PollError`]: per-attempt failures. Carried inside `error` events and
//!   handed to error listeners; a `PollError` never tears the scheduler down.
//!
//! ## Conventions
//!
//! - Attempt failures are carried as rendered strings so events stay `Clone`
//!   and cheap to fan out.
//! - `as_label()` returns a stable snake_case tag for log lines and metrics.

use std::any::Any;

use thiserror::Error;

use crate::poll::Mode;

/// Errors raised while building a poller.
///
/// These surface from the factory functions ([`pollify`](crate::pollify),
/// [`event_stream`](crate::event_stream)) before anything is spawned.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// The mode tag did not name one of the three calling conventions.
    #[error("unknown poll mode {mode:?} (expected \"return\", \"callback\" or \"promise\")")]
    UnknownMode {
        /// The tag as supplied.
        mode: String,
    },

    /// The declared mode disagrees with the source's actual convention.
    #[error("declared mode \"{declared}\" does not match source convention \"{actual}\"")]
    ModeMismatch {
        /// Mode named in the configuration.
        declared: Mode,
        /// Convention the source was built with.
        actual: Mode,
    },
}

impl ConfigError {
    /// Stable identifier for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::UnknownMode { .. } => "config_unknown_mode",
            ConfigError::ModeMismatch { .. } => "config_mode_mismatch",
        }
    }
}

/// Failure of a single poll attempt.
///
/// Every variant is survivable: the scheduler emits it as an `error` event
/// and keeps its cadence. Stopping is always the caller's decision.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum PollError {
    /// The source reported a failure (returned `Err`, rejected, or called
    /// back with an error).
    #[error("poll attempt failed: {error}")]
    Fail {
        /// Rendered failure message.
        error: String,
    },

    /// The source panicked mid-attempt. The panic is caught at the poll
    /// boundary and converted, never propagated.
    #[error("poll attempt panicked: {detail}")]
    Panicked {
        /// Rendered panic payload.
        detail: String,
    },

    /// A callback-mode source dropped its [`Completion`](crate::Completion)
    /// without settling it.
    #[error("poll completion dropped before it was settled")]
    CompletionDropped,
}

impl PollError {
    /// Shorthand for [`PollError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        PollError::Fail { error: error.into() }
    }

    /// Stable identifier for logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PollError::Fail { .. } => "poll_fail",
            PollError::Panicked { .. } => "poll_panicked",
            PollError::CompletionDropped => "poll_completion_dropped",
        }
    }

    /// True when the attempt died by panic rather than a reported failure.
    pub fn is_panic(&self) -> bool {
        matches!(self, PollError::Panicked { .. })
    }
}

impl From<String> for PollError {
    fn from(error: String) -> Self {
        PollError::Fail { error }
    }
}

impl From<&str> for PollError {
    fn from(error: &str) -> Self {
        PollError::Fail { error: error.to_string() }
    }
}

/// Renders a caught panic payload into something readable.
///
/// Panics raised via `panic!("...")` carry `&str` or `String`; anything else
/// degrades to a placeholder.
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}
