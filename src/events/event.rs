//! # Lifecycle events emitted by the poll scheduler.
//!
//! The [`PollEventKind`] enum classifies what happened; [`PollEvent`] carries
//! the metadata shared by every kind (sequence, timestamp, source name, tick).
//!
//! Data and error events are mirrors: the same payload handed synchronously
//! to the registered listeners is also published here for out-of-band
//! observers (log writers, test probes).
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events from
//! several pollers interleave.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use pollify::{PollEvent, PollEventKind};
//!
//! let source: Arc<str> = Arc::from("feed");
//! let ev = PollEvent::now(&source, PollEventKind::Data(17_u32)).with_tick(3);
//!
//! assert!(ev.kind.is_data());
//! assert_eq!(ev.tick, Some(3));
//! assert_eq!(&*ev.source, "feed");
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::error::PollError;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of poll lifecycle events.
#[derive(Debug, Clone)]
pub enum PollEventKind<T> {
    /// The scheduler armed itself: a start request took effect.
    ///
    /// Sets:
    /// - `source`: poller name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Started,

    /// One attempt is about to run (the rate delay just elapsed).
    ///
    /// Sets:
    /// - `source`: poller name
    /// - `tick`: attempt number (1-based)
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TickStarted,

    /// An attempt produced a value. Mirrors the synchronous `data` emission.
    ///
    /// Sets:
    /// - `source`: poller name
    /// - `tick`: attempt number
    /// - `at`: wall-clock timestamp (same instant the listeners saw)
    /// - `seq`: global sequence
    Data(T),

    /// An attempt failed. Mirrors the synchronous `error` emission.
    ///
    /// Sets:
    /// - `source`: poller name
    /// - `tick`: attempt number
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Error(PollError),

    /// The scheduler disarmed itself: a stop request (or the last handle
    /// going away) took effect.
    ///
    /// Sets:
    /// - `source`: poller name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Stopped,
}

impl<T> PollEventKind<T> {
    /// Stable identifier for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            PollEventKind::Started => "started",
            PollEventKind::TickStarted => "tick_started",
            PollEventKind::Data(_) => "data",
            PollEventKind::Error(_) => "error",
            PollEventKind::Stopped => "stopped",
        }
    }

    #[inline]
    pub fn is_data(&self) -> bool {
        matches!(self, PollEventKind::Data(_))
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, PollEventKind::Error(_))
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        matches!(self, PollEventKind::Stopped)
    }
}

/// Lifecycle event with shared metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - `source`: name of the poller that emitted it
/// - `tick`: attempt number, set for per-attempt kinds
#[derive(Debug, Clone)]
pub struct PollEvent<T> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Name of the emitting poller.
    pub source: Arc<str>,
    /// Attempt number (starting from 1), for per-attempt kinds.
    pub tick: Option<u64>,
    /// Event classification and payload.
    pub kind: PollEventKind<T>,
}

impl<T> PollEvent<T> {
    /// Creates an event stamped with the current wall clock.
    pub fn now(source: &Arc<str>, kind: PollEventKind<T>) -> Self {
        Self::stamped(SystemTime::now(), source, kind)
    }

    /// Creates an event with an explicit timestamp.
    ///
    /// Used for data/error mirrors, which must carry the exact instant the
    /// synchronous listeners observed.
    pub fn stamped(at: SystemTime, source: &Arc<str>, kind: PollEventKind<T>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at,
            source: Arc::clone(source),
            tick: None,
            kind,
        }
    }

    /// Attaches the attempt number.
    #[inline]
    pub fn with_tick(mut self, tick: u64) -> Self {
        self.tick = Some(tick);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let source: Arc<str> = Arc::from("s");
        let a = PollEvent::now(&source, PollEventKind::<u8>::Started);
        let b = PollEvent::now(&source, PollEventKind::<u8>::Stopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_with_tick_sets_attempt_number() {
        let source: Arc<str> = Arc::from("s");
        let ev = PollEvent::now(&source, PollEventKind::Data("v")).with_tick(4);
        assert_eq!(ev.tick, Some(4));
        assert!(ev.kind.is_data());
    }

    #[test]
    fn test_labels_cover_all_kinds() {
        let kinds: Vec<PollEventKind<u8>> = vec![
            PollEventKind::Started,
            PollEventKind::TickStarted,
            PollEventKind::Data(0),
            PollEventKind::Error(PollError::fail("x")),
            PollEventKind::Stopped,
        ];
        let labels: Vec<_> = kinds.iter().map(|k| k.as_label()).collect();
        assert_eq!(labels, ["started", "tick_started", "data", "error", "stopped"]);
    }

    #[test]
    fn test_stamped_preserves_timestamp() {
        let source: Arc<str> = Arc::from("s");
        let at = SystemTime::UNIX_EPOCH;
        let ev = PollEvent::stamped(at, &source, PollEventKind::<u8>::TickStarted);
        assert_eq!(ev.at, at);
    }
}
