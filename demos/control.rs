//! # Example: control
//!
//! Start/stop discipline, including a stop issued from inside a listener.
//!
//! Shows how to:
//! - Capture a weak [`PollControl`] inside a `data` listener.
//! - Stop the poller from the listener: emission happens before re-arming,
//!   so the stop lands before the next attempt is scheduled.
//! - Restart the same poller and absorb redundant start/stop requests.
//! - Follow state transitions through [`Poller::state_watch`].
//!
//! ## Run
//! ```bash
//! cargo run --example control
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pollify::{Mode, PollConfig, PollFn, PollState, pollify};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let ticks = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&ticks);

    let poller = pollify(
        PollConfig::new(Duration::from_millis(150), Mode::Return),
        PollFn::returning("burst", move || {
            Ok(counter.fetch_add(1, Ordering::Relaxed) + 1)
        }),
    )?;

    // A weak control handle keeps no strong reference: capturing it in the
    // listener cannot keep the scheduler alive forever.
    let control = poller.control();
    poller.on_data(move |tick, _| {
        println!("[burst] tick {tick}");
        if *tick == 3 {
            println!("[burst] three ticks seen, stopping from the listener");
            control.stop();
        }
    });

    // Wait for the scheduler to arm itself, then for the listener's stop.
    let mut state = poller.state_watch();
    state.wait_for(|s| s.is_active()).await?;
    state.wait_for(|s| *s == PollState::Stopped).await?;
    println!("stopped after {} ticks", ticks.load(Ordering::Relaxed));

    // Redundant requests are absorbed: one start arms the scheduler, the
    // extras change nothing.
    poller.start();
    poller.start();
    poller.stop();
    poller.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("redundant start/stop absorbed; state={}", poller.state().as_label());

    // Restart for one more burst, then stop from the outside.
    poller.start();
    tokio::time::sleep(Duration::from_millis(500)).await;
    poller.stop();
    state.wait_for(|s| *s == PollState::Stopped).await?;
    println!("final tick count: {}", ticks.load(Ordering::Relaxed));

    Ok(())
}
