//! # Example: basic
//!
//! Smallest useful poller: a return-mode heartbeat.
//!
//! Shows how to:
//! - Build a source from a plain closure with [`PollFn::returning`].
//! - Create an auto-started poller via [`pollify`].
//! - Receive values through a synchronous `data` listener.
//! - Stop the poller and observe its state.
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pollify::{Mode, PollConfig, PollFn, pollify};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let ticks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&ticks);

    let poller = pollify(
        PollConfig::new(Duration::from_millis(200), Mode::Return),
        PollFn::returning("heartbeat", move || {
            Ok(counter.fetch_add(1, Ordering::Relaxed) + 1)
        }),
    )?;

    poller.on_data(|beat, _at| println!("[heartbeat] beat #{beat}"));
    println!("polling every 200ms; state={}", poller.state().as_label());

    tokio::time::sleep(Duration::from_secs(1)).await;

    poller.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("stopped; state={}", poller.state().as_label());

    Ok(())
}
