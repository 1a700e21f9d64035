//! # Example: subscriber
//!
//! Out-of-band observation of the poll lifecycle.
//!
//! Shows how to:
//! - Implement the [`Subscribe`] trait for a custom observer.
//! - Attach subscribers at construction with [`Poller::spawn_with_subscribers`],
//!   so they see the very first `Started` event.
//! - Combine a custom subscriber with the built-in [`LogWriter`].
//!
//! ## Flow
//! ```text
//! PollActor ──► Bus.publish(Started / TickStarted / Data / Error / Stopped)
//!     └─► pump ──► SubscriberSet
//!                     ├─► [queue] ─► worker ─► LogWriter.on_event()
//!                     └─► [queue] ─► worker ─► ErrorAlert.on_event()
//! ```
//!
//! ## Run
//! Requires the `logging` feature to export [`LogWriter`].
//! ```bash
//! cargo run --example subscriber --features logging
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pollify::{
    LogWriter, Mode, PollConfig, PollError, PollEvent, PollEventKind, PollFn, Poller, Subscribe,
};

/// Prints a line for every failed attempt. In real life this could export
/// metrics, ship logs, or trigger alerts.
struct ErrorAlert;

#[async_trait::async_trait]
impl Subscribe<u64> for ErrorAlert {
    async fn on_event(&self, event: &PollEvent<u64>) {
        if let PollEventKind::Error(err) = &event.kind {
            println!(
                "[alert] source={} tick={:?} label={} ({err})",
                event.source,
                event.tick,
                err.as_label()
            );
        }
    }

    fn name(&self) -> &'static str {
        "error-alert"
    }

    fn queue_capacity(&self) -> usize {
        256
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let attempts = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&attempts);

    // Every third attempt fails, so both subscribers have something to say.
    let source = PollFn::returning("flaky-feed", move || {
        let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
        if n % 3 == 0 {
            Err(PollError::fail(format!("feed unavailable (attempt {n})")))
        } else {
            Ok(n)
        }
    });

    let subscribers: Vec<Arc<dyn Subscribe<u64>>> = vec![Arc::new(LogWriter), Arc::new(ErrorAlert)];
    let poller = Poller::spawn_with_subscribers(
        PollConfig::new(Duration::from_millis(200), Mode::Return),
        source,
        subscribers,
    )?;

    tokio::time::sleep(Duration::from_millis(1500)).await;
    poller.stop();

    // Give the workers a moment to drain their queues before exiting.
    tokio::time::sleep(Duration::from_millis(100)).await;
    println!("done after {} attempts", attempts.load(Ordering::Relaxed));

    Ok(())
}
