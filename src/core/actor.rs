//! # PollActor: scheduler for one poll source.
//!
//! Owns the start/stop state machine and the cadence timer for a single
//! [`PollSource`]. Commands arrive over an unbounded channel from any number
//! of [`Poller`](crate::Poller)/[`PollControl`](crate::PollControl) handles;
//! observable state is mirrored through a `watch` channel.
//!
//! ## Architecture
//! ```text
//! Poller ──commands──► PollActor::run()
//!
//! loop {                                    // Stopped
//!   ├─► await Start
//!   ├─► publish Started, state = Scheduled
//!   └─► loop {                              // armed
//!         ├─► sleep(rate)  ◄── Start while waiting is a no-op
//!         │                ◄── Stop cancels the timer → back to Stopped
//!         ├─► state = InFlight
//!         ├─► run_once() ── attempt + data/error emission
//!         ├─► drain commands seen while in flight
//!         │     ├─► Stop seen → publish Stopped → back to Stopped
//!         │     └─► otherwise → state = Scheduled, re-arm
//!         └─► repeat
//!       }
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; a new timer is armed only after the
//!   previous attempt fully completes and emits. Overlap is impossible.
//! - The rate is **completion-to-start**: the timer starts after emission,
//!   so a slow source stretches the period rather than stacking attempts.
//! - `Start` while armed or in flight changes **nothing**: the pending timer
//!   keeps its deadline, so cadence never accelerates.
//! - `Stop` during an attempt never aborts it; the attempt finishes, emits,
//!   and only then is the stop honored.
//! - Commands seen while in flight are honored before re-arming: a stop
//!   issued from inside a listener lands before the next schedule. Starts
//!   seen there are absorbed like any other redundant start.
//! - When every command sender is gone the actor shuts itself down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tokio::sync::watch;
use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    core::runner::run_once,
    core::state::{Command, PollState},
    events::{Bus, Listeners, PollEvent, PollEventKind},
    poll::SourceRef,
};

/// Scheduler loop for one source. Spawned once per poller.
pub(crate) struct PollActor<T> {
    /// Source to poll.
    pub(crate) source: SourceRef<T>,
    /// Completion-to-start delay between attempts.
    pub(crate) rate: Duration,
    /// Synchronous emission targets.
    pub(crate) listeners: Arc<Listeners<T>>,
    /// Lifecycle event bus.
    pub(crate) bus: Bus<T>,
    /// Control commands from the handles.
    pub(crate) commands: UnboundedReceiver<Command>,
    /// Observable state mirror.
    pub(crate) state: watch::Sender<PollState>,
    /// Cancelled when the actor exits, releasing attached observers.
    pub(crate) shutdown: CancellationToken,
}

impl<T> PollActor<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Runs the scheduler until every handle is gone.
    ///
    /// ### Exit conditions
    /// - The command channel closes (all `Poller` clones dropped). An armed
    ///   timer is abandoned; an in-flight attempt still completes and emits.
    ///
    /// ### State mirror semantics
    /// - `state` deduplicates writes, so watchers only wake on transitions.
    /// - The `Stopped` event is published only when leaving an armed or
    ///   in-flight state, never for redundant stop requests.
    pub(crate) async fn run(mut self) {
        let name: Arc<str> = Arc::from(self.source.name());
        let mut tick: u64 = 0;

        'stopped: loop {
            // Stopped: nothing armed, wait for a start request.
            match self.commands.recv().await {
                Some(Command::Start) => {}
                Some(Command::Stop) => continue 'stopped,
                None => break 'stopped,
            }

            self.set_state(PollState::Scheduled);
            self.bus.publish(PollEvent::now(&name, PollEventKind::Started));

            loop {
                // One timer per schedule; redundant starts do not reset it.
                let sleep = time::sleep(self.rate);
                tokio::pin!(sleep);

                loop {
                    select! {
                        _ = &mut sleep => break,
                        cmd = self.commands.recv() => match cmd {
                            Some(Command::Start) => continue,
                            Some(Command::Stop) => {
                                self.enter_stopped(&name);
                                continue 'stopped;
                            }
                            None => {
                                self.enter_stopped(&name);
                                break 'stopped;
                            }
                        },
                    }
                }

                self.set_state(PollState::InFlight);
                tick += 1;
                run_once(self.source.as_ref(), tick, &self.listeners, &self.bus, &name).await;

                // Requests issued while in flight (including a stop() called
                // from inside a listener) are honored before re-arming.
                let drained = self.drain_commands();
                if drained.stop || drained.closed {
                    self.enter_stopped(&name);
                    if drained.closed {
                        break 'stopped;
                    }
                    continue 'stopped;
                }

                self.set_state(PollState::Scheduled);
            }
        }

        self.set_state(PollState::Stopped);
        self.shutdown.cancel();
    }

    /// Collects every command that arrived while the attempt was running.
    ///
    /// `Start` is absorbed: the machine was not stopped at any point the
    /// sender could have observed, so there is nothing to (re)start.
    fn drain_commands(&mut self) -> Drained {
        let mut drained = Drained { stop: false, closed: false };
        loop {
            match self.commands.try_recv() {
                Ok(Command::Stop) => drained.stop = true,
                Ok(Command::Start) => {}
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.closed = true;
                    break;
                }
            }
        }
        drained
    }

    fn enter_stopped(&self, name: &Arc<str>) {
        self.set_state(PollState::Stopped);
        self.bus.publish(PollEvent::now(name, PollEventKind::Stopped));
    }

    fn set_state(&self, next: PollState) {
        self.state.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                *state = next;
                true
            }
        });
    }
}

/// Outcome of a post-attempt command drain.
struct Drained {
    stop: bool,
    closed: bool,
}
