//! Tick sources for practice sessions.
//!
//! A clock never touches session state. It only produces [`Tick`] tokens; the
//! owner of the clock feeds them back into
//! [`SessionController::on_tick`](crate::session::SessionController::on_tick).
//! Every tick carries the epoch of the `start` call that produced it, so a tick
//! that was already in flight when the stream was stopped or restarted can be
//! recognised and dropped.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{CoreError, Result};

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// One elapsed period of a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Epoch passed to the [`Clock::start`] call that produced this tick.
    pub epoch: u64,
}

/// A cancelable periodic tick source.
pub trait Clock {
    /// Begin producing ticks tagged with `epoch`.
    ///
    /// A stream that is already running is stopped first; there is never more
    /// than one live stream per clock.
    fn start(&mut self, epoch: u64);

    /// Stop producing ticks. Safe to call repeatedly or before any `start`.
    fn stop(&mut self);

    fn is_running(&self) -> bool;
}

/// Deterministic clock driven by hand.
///
/// Used by tests and by offline simulation: each call to [`ManualClock::fire`]
/// stands for one elapsed second.
#[derive(Debug, Default)]
pub struct ManualClock {
    epoch: Option<u64>,
    starts: u32,
    stops: u32,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce the next tick, or `None` while stopped.
    pub fn fire(&self) -> Option<Tick> {
        self.epoch.map(|epoch| Tick { epoch })
    }

    /// Number of `start` calls seen.
    pub fn starts(&self) -> u32 {
        self.starts
    }

    /// Number of `stop` calls that actually stopped a running stream.
    pub fn stops(&self) -> u32 {
        self.stops
    }
}

impl Clock for ManualClock {
    fn start(&mut self, epoch: u64) {
        self.stop();
        self.epoch = Some(epoch);
        self.starts += 1;
    }

    fn stop(&mut self) {
        if self.epoch.take().is_some() {
            self.stops += 1;
        }
    }

    fn is_running(&self) -> bool {
        self.epoch.is_some()
    }
}

/// Wall-clock tick source backed by a Tokio interval task.
///
/// Ticks are delivered through the receiver returned by [`IntervalClock::new`].
/// The interval task is aborted on `stop`, on restart, and on drop.
#[derive(Debug)]
pub struct IntervalClock {
    period: Duration,
    runtime: tokio::runtime::Handle,
    tx: mpsc::UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
}

impl IntervalClock {
    /// Create a clock bound to the current Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error when called outside a Tokio runtime.
    pub fn new(period: Duration) -> Result<(Self, mpsc::UnboundedReceiver<Tick>)> {
        if period.is_zero() {
            return Err(CoreError::Validation(crate::error::ValidationError::invalid(
                "period",
                "tick period must be greater than zero",
            )));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CoreError::Runtime(e.to_string()))?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok((
            Self {
                period,
                runtime,
                tx,
                task: None,
            },
            rx,
        ))
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Clock for IntervalClock {
    fn start(&mut self, epoch: u64) {
        self.stop();

        let tx = self.tx.clone();
        let period = self.period;
        self.task = Some(self.runtime.spawn(async move {
            // First tick one full period after start, not immediately.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(Tick { epoch }).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        self.stop();
    }
}
