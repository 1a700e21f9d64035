//! # Poller: the user-facing handle.
//!
//! A [`Poller`] is a cheap clonable handle over a spawned
//! [`PollActor`](crate::core::actor::PollActor). Creating one via
//! [`pollify`] / [`event_stream`] arms the scheduler immediately: the first
//! attempt runs one rate period later, no explicit `start()` needed.
//!
//! ## Handles and lifetime
//! ```text
//! pollify(config, source) ──► Poller ──┬── clone() ──► Poller
//!                                      └── control() ─► PollControl (weak)
//!
//! all Pollers dropped ──► command channel closes ──► actor shuts down
//! ```
//!
//! [`PollControl`] is a weak handle: it can start/stop the scheduler but
//! does not keep it alive, which makes it safe to capture inside `data`
//! and `error` listeners.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::select;
use tokio::sync::mpsc::{self, UnboundedSender, WeakUnboundedSender};
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    config::PollConfig,
    core::actor::PollActor,
    core::state::{Command, PollState},
    error::{ConfigError, PollError},
    events::{Bus, Listeners, PollEvent},
    poll::{Mode, PollSource, SourceRef},
    subscribers::{Subscribe, SubscriberSet},
};

/// Handle to a running poll scheduler.
///
/// Clones share the same scheduler. The scheduler runs until `stop()` is
/// honored and keeps existing until every `Poller` clone is dropped.
pub struct Poller<T> {
    name: Arc<str>,
    mode: Mode,
    rate: Duration,
    commands: UnboundedSender<Command>,
    state_rx: watch::Receiver<PollState>,
    listeners: Arc<Listeners<T>>,
    bus: Bus<T>,
}

impl<T> Clone for Poller<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            mode: self.mode,
            rate: self.rate,
            commands: self.commands.clone(),
            state_rx: self.state_rx.clone(),
            listeners: Arc::clone(&self.listeners),
            bus: self.bus.clone(),
        }
    }
}

impl<T> Poller<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawns a scheduler for `source` and starts it.
    ///
    /// Fails with [`ConfigError::ModeMismatch`] when the configured mode
    /// disagrees with the source's convention; nothing is spawned then.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn<S>(config: PollConfig, source: S) -> Result<Self, ConfigError>
    where
        S: PollSource<T>,
    {
        Self::spawn_with_subscribers(config, source, Vec::new())
    }

    /// Like [`spawn`](Poller::spawn), with lifecycle observers attached
    /// before the scheduler starts, so they see the first `Started` event.
    pub fn spawn_with_subscribers<S>(
        config: PollConfig,
        source: S,
        subscribers: Vec<Arc<dyn Subscribe<T>>>,
    ) -> Result<Self, ConfigError>
    where
        S: PollSource<T>,
    {
        let source: SourceRef<T> = Arc::new(source);
        if config.mode != source.mode() {
            return Err(ConfigError::ModeMismatch {
                declared: config.mode,
                actual: source.mode(),
            });
        }

        let name: Arc<str> = Arc::from(source.name());
        let bus: Bus<T> = Bus::new(config.bus_capacity_clamped());
        let listeners = Arc::new(Listeners::new());
        let shutdown = CancellationToken::new();

        let (commands, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PollState::Stopped);

        spawn_subscriber_pump(&bus, subscribers, shutdown.clone());

        let actor = PollActor {
            source,
            rate: config.rate,
            listeners: Arc::clone(&listeners),
            bus: bus.clone(),
            commands: command_rx,
            state: state_tx,
            shutdown,
        };
        tokio::spawn(actor.run());

        let poller = Self {
            name,
            mode: config.mode,
            rate: config.rate,
            commands,
            state_rx,
            listeners,
            bus,
        };
        poller.start();
        Ok(poller)
    }

    /// Requests the scheduler to arm itself. No effect while it is already
    /// armed or in flight; in particular the pending timer keeps its
    /// deadline, so cadence never accelerates.
    pub fn start(&self) {
        let _ = self.commands.send(Command::Start);
    }

    /// Requests the scheduler to disarm. An armed timer is cancelled; an
    /// in-flight attempt always runs to completion and emits first.
    /// Redundant requests have no effect.
    pub fn stop(&self) {
        let _ = self.commands.send(Command::Stop);
    }

    /// Registers a `data` listener.
    ///
    /// Invoked synchronously on the scheduler's task for every successful
    /// attempt, before the next attempt is armed. Calling
    /// [`PollControl::stop`] from inside the listener therefore prevents
    /// re-arming.
    pub fn on_data<F>(&self, listener: F)
    where
        F: Fn(&T, SystemTime) + Send + Sync + 'static,
    {
        self.listeners.on_data(Arc::new(listener));
    }

    /// Registers an `error` listener.
    ///
    /// Invoked synchronously for every failed attempt. A failure never
    /// stops the scheduler by itself; stopping here is the listener's call.
    pub fn on_error<F>(&self, listener: F)
    where
        F: Fn(&PollError) + Send + Sync + 'static,
    {
        self.listeners.on_error(Arc::new(listener));
    }

    /// Current scheduler state.
    pub fn state(&self) -> PollState {
        *self.state_rx.borrow()
    }

    /// Watch channel mirroring state transitions.
    pub fn state_watch(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Opens a subscription to the lifecycle event bus.
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent<T>> {
        self.bus.subscribe()
    }

    /// Weak control handle, safe to capture inside listeners.
    pub fn control(&self) -> PollControl {
        PollControl {
            commands: self.commands.downgrade(),
            state_rx: self.state_rx.clone(),
        }
    }

    /// Name of the underlying source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Calling convention of the underlying source.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Configured completion-to-start delay.
    pub fn rate(&self) -> Duration {
        self.rate
    }
}

/// Weak control handle over a poll scheduler.
///
/// Holds no strong reference: listeners can capture it without keeping the
/// scheduler alive forever. Once every [`Poller`] clone is gone, requests
/// become silent no-ops.
#[derive(Clone)]
pub struct PollControl {
    commands: WeakUnboundedSender<Command>,
    state_rx: watch::Receiver<PollState>,
}

impl PollControl {
    /// Requests the scheduler to arm itself (idempotent).
    pub fn start(&self) {
        if let Some(commands) = self.commands.upgrade() {
            let _ = commands.send(Command::Start);
        }
    }

    /// Requests the scheduler to disarm (idempotent, never aborts an
    /// in-flight attempt).
    pub fn stop(&self) {
        if let Some(commands) = self.commands.upgrade() {
            let _ = commands.send(Command::Stop);
        }
    }

    /// Current scheduler state.
    pub fn state(&self) -> PollState {
        *self.state_rx.borrow()
    }

    /// True unless the scheduler is fully stopped.
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }
}

/// Bridges the event bus to a [`SubscriberSet`] until the actor exits.
fn spawn_subscriber_pump<T>(
    bus: &Bus<T>,
    subscribers: Vec<Arc<dyn Subscribe<T>>>,
    shutdown: CancellationToken,
) where
    T: Clone + Send + Sync + 'static,
{
    if subscribers.is_empty() {
        return;
    }

    let mut rx = bus.subscribe();
    let set = SubscriberSet::new(subscribers);

    tokio::spawn(async move {
        loop {
            select! {
                // Drain pending events ahead of shutdown so the final
                // `Stopped` reaches the subscribers.
                biased;
                event = rx.recv() => match event {
                    Ok(event) => set.emit(&event),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                },
                _ = shutdown.cancelled() => break,
            }
        }
        set.shutdown().await;
    });
}

/// Creates a poller for `source` and starts it.
///
/// The first attempt runs one rate period after creation; results surface
/// through [`Poller::on_data`] / [`Poller::on_error`] listeners and on the
/// lifecycle bus.
///
/// ## Example
/// ```no_run
/// use std::time::Duration;
/// use pollify::{Mode, PollConfig, PollFn, pollify};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), pollify::ConfigError> {
/// let poller = pollify(
///     PollConfig::new(Duration::from_secs(1), Mode::Return),
///     PollFn::returning("uptime", || Ok(42_u64)),
/// )?;
/// poller.on_data(|value, _| println!("uptime: {value}"));
/// # Ok(())
/// # }
/// ```
pub fn pollify<T, S>(config: PollConfig, source: S) -> Result<Poller<T>, ConfigError>
where
    T: Clone + Send + Sync + 'static,
    S: PollSource<T>,
{
    Poller::spawn(config, source)
}

/// Creates a poller for `source` and starts it.
///
/// Interchangeable with [`pollify`]: the two names construct identical
/// pollers and exist for callers that think of the result as a stream of
/// events rather than a polling loop.
pub fn event_stream<T, S>(config: PollConfig, source: S) -> Result<Poller<T>, ConfigError>
where
    T: Clone + Send + Sync + 'static,
    S: PollSource<T>,
{
    Poller::spawn(config, source)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::time::{self, Instant};

    use super::*;
    use crate::events::PollEventKind;
    use crate::poll::{Completion, PollFn};

    const RATE: Duration = Duration::from_millis(20);

    fn config(mode: Mode) -> PollConfig {
        PollConfig::new(RATE, mode)
    }

    async fn wait_for_count(counter: &Arc<AtomicUsize>, at_least: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while counter.load(Ordering::SeqCst) < at_least {
            assert!(
                Instant::now() < deadline,
                "timed out waiting for {at_least} emissions (saw {})",
                counter.load(Ordering::SeqCst)
            );
            time::sleep(Duration::from_millis(2)).await;
        }
    }

    fn counting_data_listener(poller: &Poller<u64>) -> Arc<AtomicUsize> {
        let counter = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&counter);
        poller.on_data(move |_, _| {
            probe.fetch_add(1, Ordering::SeqCst);
        });
        counter
    }

    #[tokio::test]
    async fn test_starts_polling_automatically() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("auto", || Ok(1_u64)),
        )
        .unwrap();

        let stamps: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        {
            let stamps = Arc::clone(&stamps);
            poller.on_data(move |_, _| stamps.lock().unwrap().push(Instant::now()));
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while stamps.lock().unwrap().len() < 2 {
            assert!(Instant::now() < deadline, "timed out waiting for automatic polling");
            time::sleep(Duration::from_millis(2)).await;
        }

        let stamps = stamps.lock().unwrap();
        assert!(stamps[1] - stamps[0] >= RATE, "cadence tighter than the rate");

        assert_eq!(poller.name(), "auto");
        assert_eq!(poller.mode(), Mode::Return);
        assert_eq!(poller.rate(), RATE);
    }

    #[tokio::test]
    async fn test_replays_captured_arguments() {
        let host = String::from("db-7");
        let port = 5432_u16;
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("echo", move || Ok(format!("{host}:{port}"))),
        )
        .unwrap();

        let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        {
            let seen = Arc::clone(&seen);
            poller.on_data(move |value: &String, _| seen.lock().unwrap().push(value.clone()));
        }

        let deadline = Instant::now() + Duration::from_secs(5);
        while seen.lock().unwrap().len() < 3 {
            assert!(Instant::now() < deadline, "timed out waiting for echoes");
            time::sleep(Duration::from_millis(2)).await;
        }

        for value in seen.lock().unwrap().iter() {
            assert_eq!(value, "db-7:5432");
        }
    }

    #[tokio::test]
    async fn test_stop_halts_emissions() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("stoppable", || Ok(0_u64)),
        )
        .unwrap();
        let count = counting_data_listener(&poller);

        wait_for_count(&count, 1).await;
        poller.stop();

        // Let a possibly already-fired tick settle, then expect silence.
        time::sleep(RATE * 3).await;
        let frozen = count.load(Ordering::SeqCst);
        time::sleep(RATE * 4).await;
        assert_eq!(count.load(Ordering::SeqCst), frozen);
        assert_eq!(poller.state(), PollState::Stopped);
    }

    #[tokio::test]
    async fn test_restart_resumes_emissions() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("restart", || Ok(0_u64)),
        )
        .unwrap();
        let count = counting_data_listener(&poller);

        wait_for_count(&count, 1).await;
        poller.stop();
        time::sleep(RATE * 3).await;
        let frozen = count.load(Ordering::SeqCst);

        poller.start();
        wait_for_count(&count, frozen + 2).await;
    }

    #[tokio::test]
    async fn test_redundant_start_does_not_accelerate_cadence() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("steady", || Ok(0_u64)),
        )
        .unwrap();

        let stamps: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        {
            let stamps = Arc::clone(&stamps);
            poller.on_data(move |_, _| stamps.lock().unwrap().push(Instant::now()));
        }

        // Already armed; these must all be absorbed.
        poller.start();
        poller.start();
        poller.start();

        let deadline = Instant::now() + Duration::from_secs(5);
        while stamps.lock().unwrap().len() < 5 {
            assert!(Instant::now() < deadline, "timed out collecting emissions");
            time::sleep(Duration::from_millis(2)).await;
        }

        let stamps = stamps.lock().unwrap();
        for pair in stamps.windows(2) {
            assert!(pair[1] - pair[0] >= RATE, "redundant start accelerated the cadence");
        }
    }

    #[tokio::test]
    async fn test_redundant_stop_is_absorbed() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("double-stop", || Ok(0_u64)),
        )
        .unwrap();
        let count = counting_data_listener(&poller);

        wait_for_count(&count, 1).await;
        poller.stop();
        poller.stop();
        poller.stop();
        time::sleep(RATE * 3).await;
        assert_eq!(poller.state(), PollState::Stopped);

        // Still restartable after the redundant stops.
        let frozen = count.load(Ordering::SeqCst);
        poller.start();
        wait_for_count(&count, frozen + 1).await;
    }

    #[tokio::test]
    async fn test_all_three_modes_emit_data() {
        let returning = pollify(
            config(Mode::Return),
            PollFn::returning("m-return", || Ok(10_u64)),
        )
        .unwrap();
        let callback = pollify(
            config(Mode::Callback),
            PollFn::callback("m-callback", |c: Completion<u64>| c.resolve(20)),
        )
        .unwrap();
        let promise = pollify(
            config(Mode::Promise),
            PollFn::promise("m-promise", || async { Ok(30_u64) }),
        )
        .unwrap();

        for (poller, expected) in [(&returning, 10), (&callback, 20), (&promise, 30)] {
            let seen = Arc::new(AtomicUsize::new(0));
            let probe = Arc::clone(&seen);
            poller.on_data(move |value, _| {
                assert_eq!(*value, expected);
                probe.fetch_add(1, Ordering::SeqCst);
            });
            wait_for_count(&seen, 1).await;
        }
    }

    #[tokio::test]
    async fn test_all_three_modes_emit_errors_and_survive() {
        let sources: Vec<Poller<u64>> = vec![
            pollify(
                config(Mode::Return),
                PollFn::returning("e-return", || Err(PollError::fail("flat"))),
            )
            .unwrap(),
            pollify(
                config(Mode::Callback),
                PollFn::callback("e-callback", |c: Completion<u64>| c.reject("cb")),
            )
            .unwrap(),
            pollify(
                config(Mode::Promise),
                PollFn::promise("e-promise", || async { Err(PollError::fail("fut")) }),
            )
            .unwrap(),
        ];

        for poller in &sources {
            let errors = Arc::new(AtomicUsize::new(0));
            let probe = Arc::clone(&errors);
            poller.on_error(move |_| {
                probe.fetch_add(1, Ordering::SeqCst);
            });
            // Two errors prove the failure did not kill the scheduler.
            wait_for_count(&errors, 2).await;
            assert!(poller.state().is_active());
        }
    }

    #[tokio::test]
    async fn test_listener_stop_prevents_rearm() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("one-shot", || Ok(0_u64)),
        )
        .unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let control = poller.control();
        {
            let count = Arc::clone(&count);
            poller.on_data(move |_, _| {
                count.fetch_add(1, Ordering::SeqCst);
                control.stop();
            });
        }

        wait_for_count(&count, 1).await;
        time::sleep(RATE * 5).await;
        assert_eq!(count.load(Ordering::SeqCst), 1, "stop from listener failed to prevent re-arm");
        assert_eq!(poller.state(), PollState::Stopped);
    }

    #[tokio::test]
    async fn test_callback_settled_from_background_task() {
        let poller = pollify(
            config(Mode::Callback),
            PollFn::callback("deferred", |c: Completion<u64>| {
                tokio::spawn(async move {
                    time::sleep(Duration::from_millis(5)).await;
                    c.resolve(77);
                });
            }),
        )
        .unwrap();

        let count = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&count);
        poller.on_data(move |value, _| {
            assert_eq!(*value, 77);
            probe.fetch_add(1, Ordering::SeqCst);
        });

        wait_for_count(&count, 2).await;
    }

    #[tokio::test]
    async fn test_dropped_completion_reports_error_and_continues() {
        let poller = pollify(
            config(Mode::Callback),
            PollFn::callback("lossy", |c: Completion<u64>| drop(c)),
        )
        .unwrap();

        let errors = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&errors);
        poller.on_error(move |err| {
            assert!(matches!(err, PollError::CompletionDropped));
            probe.fetch_add(1, Ordering::SeqCst);
        });

        wait_for_count(&errors, 2).await;
    }

    #[tokio::test]
    async fn test_panicking_source_is_isolated() {
        let poller: Poller<u64> = pollify(
            config(Mode::Return),
            PollFn::returning("explodes", || panic!("tick went sideways")),
        )
        .unwrap();

        let errors = Arc::new(AtomicUsize::new(0));
        let probe = Arc::clone(&errors);
        poller.on_error(move |err| {
            assert!(err.is_panic());
            probe.fetch_add(1, Ordering::SeqCst);
        });

        wait_for_count(&errors, 2).await;

        poller.stop();
        let mut watch = poller.state_watch();
        watch.wait_for(|s| *s == PollState::Stopped).await.unwrap();
    }

    #[tokio::test]
    async fn test_mode_mismatch_is_rejected() {
        let result = pollify(
            config(Mode::Callback),
            PollFn::returning("mismatched", || Ok(0_u64)),
        );

        assert!(matches!(
            result,
            Err(ConfigError::ModeMismatch { declared: Mode::Callback, actual: Mode::Return })
        ));
    }

    #[tokio::test]
    async fn test_event_stream_is_interchangeable_with_pollify() {
        let via_stream = event_stream(
            config(Mode::Promise),
            PollFn::promise("stream", || async { Ok(5_u64) }),
        )
        .unwrap();
        let count = counting_data_listener(&via_stream);
        wait_for_count(&count, 1).await;
        assert_eq!(via_stream.name(), "stream");
    }

    #[tokio::test]
    async fn test_bus_mirrors_lifecycle_in_order() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("observed", || Ok(9_u64)),
        )
        .unwrap();
        let mut rx = poller.subscribe();

        let started = rx.recv().await.unwrap();
        assert!(matches!(started.kind, PollEventKind::Started));

        let tick = rx.recv().await.unwrap();
        assert!(matches!(tick.kind, PollEventKind::TickStarted));
        assert_eq!(tick.tick, Some(1));
        assert!(tick.seq > started.seq);

        let data = rx.recv().await.unwrap();
        assert!(matches!(data.kind, PollEventKind::Data(9)));
        assert_eq!(data.tick, Some(1));

        poller.stop();
        loop {
            let event = rx.recv().await.unwrap();
            if event.kind.is_stopped() {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_dropping_every_handle_stops_the_actor() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("abandoned", || Ok(0_u64)),
        )
        .unwrap();
        let mut rx = poller.subscribe();
        let control = poller.control();

        drop(poller);

        loop {
            match rx.recv().await {
                Ok(event) if event.kind.is_stopped() => break,
                Ok(_) => continue,
                Err(err) => panic!("bus closed before Stopped: {err}"),
            }
        }

        // The weak handle outlives the scheduler without reviving it.
        control.start();
        assert_eq!(control.state(), PollState::Stopped);
        assert!(!control.is_active());
    }

    #[tokio::test]
    async fn test_state_watch_tracks_transitions() {
        let poller = pollify(
            config(Mode::Return),
            PollFn::returning("watched", || Ok(0_u64)),
        )
        .unwrap();

        let mut watch = poller.state_watch();
        watch.wait_for(|s| *s == PollState::Scheduled).await.unwrap();

        poller.stop();
        watch.wait_for(|s| *s == PollState::Stopped).await.unwrap();
        assert!(!poller.state().is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_never_overlap() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let poller = {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            pollify(
                PollConfig::new(Duration::from_millis(10), Mode::Promise),
                PollFn::promise("slow", move || {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        // Far longer than the rate: overlap would show here.
                        time::sleep(Duration::from_millis(50)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok(1_u64)
                    }
                }),
            )
            .unwrap()
        };

        let count = counting_data_listener(&poller);
        wait_for_count(&count, 3).await;

        assert_eq!(peak.load(Ordering::SeqCst), 1, "attempts overlapped");
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_attempt_stretches_the_period() {
        let poller = pollify(
            PollConfig::new(Duration::from_millis(20), Mode::Promise),
            PollFn::promise("stretch", || async {
                time::sleep(Duration::from_millis(50)).await;
                Ok(0_u64)
            }),
        )
        .unwrap();

        let stamps: Arc<Mutex<Vec<Instant>>> = Arc::new(Mutex::new(Vec::new()));
        {
            let stamps = Arc::clone(&stamps);
            poller.on_data(move |_, _| stamps.lock().unwrap().push(Instant::now()));
        }

        let deadline = Instant::now() + Duration::from_secs(60);
        while stamps.lock().unwrap().len() < 3 {
            assert!(Instant::now() < deadline, "timed out collecting emissions");
            time::sleep(Duration::from_millis(2)).await;
        }

        // Completion-to-start rate: period = rate + attempt duration.
        let stamps = stamps.lock().unwrap();
        for pair in stamps.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= Duration::from_millis(70), "period compressed to {gap:?}");
            assert!(gap < Duration::from_millis(100), "period drifted to {gap:?}");
        }
    }

    #[tokio::test]
    async fn test_unsettled_completion_stalls_without_dying() {
        let parked: Arc<Mutex<Vec<Completion<u64>>>> = Arc::new(Mutex::new(Vec::new()));
        let poller = {
            let parked = Arc::clone(&parked);
            pollify(
                config(Mode::Callback),
                PollFn::callback("stalled", move |c| parked.lock().unwrap().push(c)),
            )
            .unwrap()
        };
        let count = counting_data_listener(&poller);

        let mut watch = poller.state_watch();
        watch.wait_for(|s| *s == PollState::InFlight).await.unwrap();

        // No settlement, no emission, no timer: the attempt just hangs.
        time::sleep(RATE * 5).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(poller.state(), PollState::InFlight);

        // A stop request is recorded but honored only after completion.
        poller.stop();
        time::sleep(RATE * 2).await;
        assert_eq!(poller.state(), PollState::InFlight);

        // Settling the parked completion lets the attempt finish, emit, and
        // then honor the stop instead of re-arming.
        let completion = parked.lock().unwrap().pop().unwrap();
        completion.resolve(3);
        watch.wait_for(|s| *s == PollState::Stopped).await.unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
