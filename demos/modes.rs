//! # Example: modes
//!
//! One poller per calling convention, all emitting side by side.
//!
//! Shows how to:
//! - Wrap a plain function with [`PollFn::returning`].
//! - Wrap a callback API with [`PollFn::callback`] and a [`Completion`].
//! - Wrap an async function with [`PollFn::promise`].
//! - Handle failures through an `error` listener without losing cadence.
//!
//! ## Run
//! ```bash
//! cargo run --example modes
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use pollify::{Completion, Mode, PollConfig, PollError, PollFn, pollify};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let rate = Duration::from_millis(250);

    // Return mode: the value comes straight back.
    let direct = pollify(
        PollConfig::new(rate, Mode::Return),
        PollFn::returning("direct", || Ok(String::from("level=ok"))),
    )?;
    direct.on_data(|value: &String, _| println!("[direct]   {value}"));

    // Callback mode: the source settles a completion, possibly later and
    // from another task.
    let callback = pollify(
        PollConfig::new(rate, Mode::Callback),
        PollFn::callback("sensor", |completion: Completion<f64>| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(40)).await;
                completion.resolve(21.5);
            });
        }),
    )?;
    callback.on_data(|reading, _| println!("[sensor]   {reading}°C"));

    // Promise mode: the source is an async function.
    let promise = pollify(
        PollConfig::new(rate, Mode::Promise),
        PollFn::promise("fetcher", || async {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok(vec![1_u8, 2, 3])
        }),
    )?;
    promise.on_data(|batch: &Vec<u8>, _| println!("[fetcher]  {} bytes", batch.len()));

    // Failures surface on the error listener; the schedule keeps going.
    let attempts = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&attempts);
    let flaky = pollify(
        PollConfig::new(rate, Mode::Return),
        PollFn::returning("flaky", move || {
            let n = counter.fetch_add(1, Ordering::Relaxed) + 1;
            if n % 2 == 0 {
                Err(PollError::fail(format!("upstream 503 on attempt {n}")))
            } else {
                Ok(n)
            }
        }),
    )?;
    flaky.on_data(|n, _| println!("[flaky]    attempt {n} succeeded"));
    flaky.on_error(|err| println!("[flaky]    {err}"));

    tokio::time::sleep(Duration::from_millis(1300)).await;

    direct.stop();
    callback.stop();
    promise.stop();
    flaky.stop();
    println!("all pollers stopped");

    Ok(())
}
