//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints lifecycle events to stdout in a human-readable
//! format. This is primarily useful for development, debugging, and demos.
//!
//! ## Output format
//! ```text
//! [started] source=feed
//! [tick_started] source=feed tick=3
//! [data] source=feed tick=3 value=17
//! [error] source=feed tick=3 label=poll_fail err="poll attempt failed: boom"
//! [stopped] source=feed
//! ```

use std::fmt;

use async_trait::async_trait;

use crate::events::{PollEvent, PollEventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use; implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl<T> Subscribe<T> for LogWriter
where
    T: fmt::Debug + Send + Sync + 'static,
{
    async fn on_event(&self, event: &PollEvent<T>) {
        let label = event.kind.as_label();
        let source = &event.source;
        match &event.kind {
            PollEventKind::Started | PollEventKind::Stopped => {
                println!("[{label}] source={source}");
            }
            PollEventKind::TickStarted => {
                println!("[{label}] source={source} tick={:?}", event.tick);
            }
            PollEventKind::Data(value) => {
                println!("[{label}] source={source} tick={:?} value={value:?}", event.tick);
            }
            PollEventKind::Error(err) => {
                println!(
                    "[{label}] source={source} tick={:?} label={} err={:?}",
                    event.tick,
                    err.as_label(),
                    err.to_string()
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
