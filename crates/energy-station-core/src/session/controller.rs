//! Session controller.
//!
//! One state machine behind every practice screen. Like the clock it owns, the
//! controller has no internal thread: the owner feeds it [`Tick`]s and user
//! commands one at a time and renders the returned events.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//! Running --reset--> Idle
//! Running --(elapsed == total)--> Completed --reset--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = SessionController::for_content(item, clock)?;
//! session.on_complete(|done| println!("finished {}", done.content_id));
//! session.start();
//! // On every tick delivered by the clock:
//! let events = session.on_tick(tick);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::countdown::TimerSelection;
use super::format_clock;
use super::plan::{validate_breathing_minutes, validate_speed, SessionPlan};
use super::sequencer::{Phase, PhaseSequencer, PhaseTransition, Visual};
use super::tracker::ProgressTracker;
use crate::clock::{Clock, ManualClock, Tick};
use crate::content::{ContentItem, ContentKind};
use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// Handed to the completion hook, once per activation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub session_id: Uuid,
    pub content_id: String,
    pub kind: ContentKind,
    pub activation: u64,
    pub elapsed_secs: f64,
}

/// Current breathing phase as shown on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseView {
    pub index: usize,
    pub name: String,
    pub instruction: String,
    pub remaining_secs: u32,
}

/// Everything the view layer reads on each render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub content_id: String,
    pub kind: ContentKind,
    pub status: SessionStatus,
    pub activation: u64,
    pub elapsed_secs: f64,
    /// `None` for open-ended white noise.
    pub total_secs: Option<u64>,
    /// Session countdown, or the white-noise timer countdown when armed.
    pub remaining_secs: Option<f64>,
    /// `MM:SS` shown on the player: the countdown when there is one,
    /// otherwise the time played.
    pub clock_label: String,
    pub progress_pct: f64,
    pub speed: f64,
    pub phase: Option<PhaseView>,
    /// Selected white-noise timer; `Some(0)` means no auto-stop.
    pub timer_minutes: Option<u32>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
enum Driver {
    Breathing {
        sequencer: PhaseSequencer,
        tracker: ProgressTracker,
    },
    Playback {
        tracker: ProgressTracker,
        speed: f64,
    },
    Ambient {
        timer: TimerSelection,
        played_secs: u64,
    },
}

impl Driver {
    fn from_plan(kind: ContentKind, plan: SessionPlan) -> Result<Self, ValidationError> {
        match (kind, plan) {
            (ContentKind::Breathing, SessionPlan::Breathing { phases, total_secs }) => {
                Ok(Driver::Breathing {
                    sequencer: PhaseSequencer::new(phases)?,
                    tracker: ProgressTracker::new(total_secs)?,
                })
            }
            (
                kind @ (ContentKind::Meditation | ContentKind::Mindfulness),
                SessionPlan::Playback { total_secs, speed },
            ) => {
                validate_speed(speed)?;
                if kind == ContentKind::Mindfulness && speed != 1.0 {
                    return Err(ValidationError::invalid(
                        "speed",
                        "mindfulness audio always plays at normal speed",
                    ));
                }
                Ok(Driver::Playback {
                    tracker: ProgressTracker::new(total_secs)?,
                    speed,
                })
            }
            (ContentKind::WhiteNoise, SessionPlan::Ambient) => Ok(Driver::Ambient {
                timer: TimerSelection::default(),
                played_secs: 0,
            }),
            (kind, plan) => Err(ValidationError::invalid(
                "plan",
                format!("{} content cannot run a {} session", kind.label(), plan.mode()),
            )),
        }
    }
}

type CompletionHook = Box<dyn FnMut(&Completion) + Send>;

/// Play/pause/reset state machine over one clock.
///
/// The controller is the only owner of its clock. Dropping the controller
/// stops the clock, whatever state the session is in.
pub struct SessionController<C: Clock> {
    id: Uuid,
    content_id: String,
    kind: ContentKind,
    status: SessionStatus,
    driver: Driver,
    clock: C,
    /// Bumped on every clock start/stop; ticks from older epochs are stale.
    epoch: u64,
    /// Number of times the session went Idle/Completed -> Running.
    activation: u64,
    on_complete: Option<CompletionHook>,
}

impl<C: Clock> SessionController<C> {
    /// Create an idle session.
    ///
    /// # Errors
    ///
    /// Rejects an invalid plan (empty phase list, zero-length phase or total,
    /// bad speed) or a plan that does not fit `kind`.
    pub fn new(
        content_id: impl Into<String>,
        kind: ContentKind,
        plan: SessionPlan,
        clock: C,
    ) -> Result<Self, ValidationError> {
        let driver = Driver::from_plan(kind, plan)?;
        Ok(Self {
            id: Uuid::new_v4(),
            content_id: content_id.into(),
            kind,
            status: SessionStatus::Idle,
            driver,
            clock,
            epoch: 0,
            activation: 0,
            on_complete: None,
        })
    }

    /// Create an idle session with the default plan for `item`.
    pub fn for_content(item: &ContentItem, clock: C) -> Result<Self, ValidationError> {
        Self::new(item.id(), item.kind(), SessionPlan::for_content(item), clock)
    }

    /// Register the completion surface. Replaces any previous hook.
    pub fn on_complete<F>(&mut self, hook: F)
    where
        F: FnMut(&Completion) + Send + 'static,
    {
        self.on_complete = Some(Box::new(hook));
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn activation(&self) -> u64 {
        self.activation
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn elapsed_secs(&self) -> f64 {
        match &self.driver {
            Driver::Breathing { tracker, .. } | Driver::Playback { tracker, .. } => {
                tracker.elapsed_secs()
            }
            Driver::Ambient { played_secs, .. } => *played_secs as f64,
        }
    }

    pub fn total_secs(&self) -> Option<u64> {
        match &self.driver {
            Driver::Breathing { tracker, .. } | Driver::Playback { tracker, .. } => {
                Some(tracker.total_secs())
            }
            Driver::Ambient { .. } => None,
        }
    }

    pub fn remaining_secs(&self) -> Option<f64> {
        match &self.driver {
            Driver::Breathing { tracker, .. } | Driver::Playback { tracker, .. } => {
                Some(tracker.remaining_secs())
            }
            Driver::Ambient { timer, .. } => timer
                .is_armed()
                .then(|| timer.remaining_secs() as f64),
        }
    }

    pub fn speed(&self) -> f64 {
        match &self.driver {
            Driver::Playback { speed, .. } => *speed,
            _ => 1.0,
        }
    }

    pub fn phase_index(&self) -> Option<usize> {
        match &self.driver {
            Driver::Breathing { sequencer, .. } => Some(sequencer.index()),
            _ => None,
        }
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        match &self.driver {
            Driver::Breathing { sequencer, .. } => Some(sequencer.current()),
            _ => None,
        }
    }

    pub fn timer(&self) -> Option<&TimerSelection> {
        match &self.driver {
            Driver::Ambient { timer, .. } => Some(timer),
            _ => None,
        }
    }

    pub fn view(&self) -> SessionView {
        let phase = match &self.driver {
            Driver::Breathing { sequencer, .. }
                if matches!(self.status, SessionStatus::Running | SessionStatus::Paused) =>
            {
                let current = sequencer.current();
                Some(PhaseView {
                    index: sequencer.index(),
                    name: current.name.clone(),
                    instruction: current.instruction.clone(),
                    remaining_secs: sequencer.phase_remaining_secs(),
                })
            }
            _ => None,
        };
        let progress_pct = match &self.driver {
            Driver::Breathing { tracker, .. } | Driver::Playback { tracker, .. } => {
                tracker.progress_pct()
            }
            Driver::Ambient { .. } => 0.0,
        };
        SessionView {
            session_id: self.id,
            content_id: self.content_id.clone(),
            kind: self.kind,
            status: self.status,
            activation: self.activation,
            elapsed_secs: self.elapsed_secs(),
            total_secs: self.total_secs(),
            remaining_secs: self.remaining_secs(),
            clock_label: format_clock(
                self.remaining_secs()
                    .unwrap_or_else(|| self.elapsed_secs()),
            ),
            progress_pct,
            speed: self.speed(),
            phase,
            timer_minutes: self.timer().map(|t| t.selected_minutes()),
            at: Utc::now(),
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot(self.view())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. No-op while running; from `Completed` a new
    /// activation begins at zero.
    pub fn start(&mut self) -> Vec<Event> {
        match self.status {
            SessionStatus::Running => Vec::new(),
            SessionStatus::Paused => self.resume(),
            SessionStatus::Idle | SessionStatus::Completed => {
                if self.status == SessionStatus::Completed {
                    self.rewind();
                }
                self.activation += 1;
                self.status = SessionStatus::Running;

                let mut events = vec![Event::SessionStarted {
                    session_id: self.id,
                    content_id: self.content_id.clone(),
                    activation: self.activation,
                    total_secs: self.total_secs(),
                    at: Utc::now(),
                }];
                if let Driver::Breathing { sequencer, .. } = &mut self.driver {
                    events.push(phase_event(sequencer.start()));
                }
                self.restart_clock();
                debug!(
                    session = %self.id,
                    content = %self.content_id,
                    activation = self.activation,
                    "session started"
                );
                events
            }
        }
    }

    /// Stop the clock but keep elapsed time and phase position.
    pub fn pause(&mut self) -> Vec<Event> {
        if self.status != SessionStatus::Running {
            return Vec::new();
        }
        self.halt_clock();
        self.status = SessionStatus::Paused;
        debug!(session = %self.id, elapsed = self.elapsed_secs(), "session paused");

        let mut events = vec![Event::SessionPaused {
            elapsed_secs: self.elapsed_secs(),
            at: Utc::now(),
        }];
        if matches!(self.driver, Driver::Breathing { .. }) {
            events.push(Event::VisualUpdated {
                visual: Visual::rest(),
                at: Utc::now(),
            });
        }
        events
    }

    pub fn toggle_play_pause(&mut self) -> Vec<Event> {
        if self.status == SessionStatus::Running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to `Idle` at zero, from any state.
    pub fn reset(&mut self) -> Vec<Event> {
        self.halt_clock();
        self.rewind();
        self.status = SessionStatus::Idle;
        debug!(session = %self.id, "session reset");

        let mut events = vec![Event::SessionReset { at: Utc::now() }];
        if matches!(self.driver, Driver::Breathing { .. }) {
            events.push(Event::VisualUpdated {
                visual: Visual::rest(),
                at: Utc::now(),
            });
        }
        events
    }

    /// Jump to an absolute playback position, clamped to `[0, total]`.
    ///
    /// Only playback sessions seek; a completed session stays put.
    pub fn seek(&mut self, position_secs: f64) -> Option<Event> {
        self.reposition(|tracker| tracker.seek_to(position_secs))
    }

    /// Jump relative to the current playback position, clamped to `[0, total]`.
    pub fn skip(&mut self, delta_secs: f64) -> Option<Event> {
        self.reposition(|tracker| tracker.skip(delta_secs))
    }

    /// # Errors
    ///
    /// Rejects non-positive speeds and sessions other than meditation.
    pub fn set_speed(&mut self, multiplier: f64) -> Result<Event, ValidationError> {
        validate_speed(multiplier)?;
        match &mut self.driver {
            Driver::Playback { speed, .. } if self.kind == ContentKind::Meditation => {
                *speed = multiplier;
                Ok(Event::SpeedChanged {
                    speed: multiplier,
                    at: Utc::now(),
                })
            }
            _ => Err(ValidationError::invalid(
                "speed",
                "speed only applies to meditation playback",
            )),
        }
    }

    /// Pick the white-noise auto-stop timer. The countdown always restarts
    /// from the full length; while playing it starts counting right away.
    ///
    /// # Errors
    ///
    /// Rejects minutes outside the timer choices and non-ambient sessions.
    pub fn set_timer_minutes(&mut self, minutes: u32) -> Result<Event, ValidationError> {
        let Driver::Ambient { timer, .. } = &mut self.driver else {
            return Err(ValidationError::invalid(
                "timer_minutes",
                "auto-stop timer only applies to white noise",
            ));
        };
        timer.select(minutes)?;
        let event = Event::TimerSelected {
            minutes,
            remaining_secs: timer.remaining_secs(),
            at: Utc::now(),
        };
        if self.status == SessionStatus::Running {
            // Count the new timer from a fresh second.
            self.restart_clock();
        }
        Ok(event)
    }

    /// Change the length of a breathing session. Returns the session to
    /// `Idle`.
    ///
    /// # Errors
    ///
    /// Refused while running, for lengths outside the duration choices, and
    /// for non-breathing sessions.
    pub fn set_practice_minutes(&mut self, minutes: u32) -> Result<Vec<Event>, ValidationError> {
        if !matches!(self.driver, Driver::Breathing { .. }) {
            return Err(ValidationError::invalid(
                "minutes",
                "practice length only applies to breathing sessions",
            ));
        }
        if self.status == SessionStatus::Running {
            return Err(ValidationError::invalid(
                "minutes",
                "practice length cannot change while running",
            ));
        }
        validate_breathing_minutes(minutes)?;

        let was_idle = self.status == SessionStatus::Idle;
        let mut events = if was_idle { Vec::new() } else { self.reset() };
        if let Driver::Breathing { tracker, .. } = &mut self.driver {
            *tracker = ProgressTracker::new(u64::from(minutes) * 60)?;
        }
        if was_idle {
            events.push(self.snapshot());
        }
        Ok(events)
    }

    /// Pick a white-noise track on the player screen.
    ///
    /// Picking the current track toggles play/pause. Picking another one
    /// resets the session and switches to it.
    ///
    /// # Errors
    ///
    /// Rejects non-white-noise items and non-ambient sessions.
    pub fn select_noise(&mut self, item: &ContentItem) -> Result<Vec<Event>, ValidationError> {
        if !matches!(self.driver, Driver::Ambient { .. }) || item.kind() != ContentKind::WhiteNoise {
            return Err(ValidationError::invalid(
                "content",
                "only white-noise tracks can be switched in place",
            ));
        }
        if item.id() == self.content_id {
            return Ok(self.toggle_play_pause());
        }
        let mut events = if self.status == SessionStatus::Idle {
            Vec::new()
        } else {
            self.reset()
        };
        self.content_id = item.id().to_string();
        events.push(Event::ContentChanged {
            content_id: self.content_id.clone(),
            at: Utc::now(),
        });
        Ok(events)
    }

    /// Apply one clock tick.
    ///
    /// Ticks from an older clock epoch, or arriving while not running, are
    /// discarded.
    pub fn on_tick(&mut self, tick: Tick) -> Vec<Event> {
        if tick.epoch != self.epoch || self.status != SessionStatus::Running {
            debug!(
                session = %self.id,
                tick_epoch = tick.epoch,
                epoch = self.epoch,
                status = ?self.status,
                "discarding stale tick"
            );
            return Vec::new();
        }

        let mut events = Vec::new();
        let finished = match &mut self.driver {
            Driver::Breathing { sequencer, tracker } => {
                if tracker.advance(1.0) {
                    true
                } else {
                    if let Some(transition) = sequencer.tick() {
                        events.push(phase_event(transition));
                    }
                    false
                }
            }
            Driver::Playback { tracker, speed } => tracker.advance(*speed),
            Driver::Ambient { timer, played_secs } => {
                *played_secs += 1;
                timer.tick()
            }
        };
        if finished {
            events.extend(self.complete());
        }
        events
    }

    /// Release the clock and end the session.
    pub fn teardown(self) {
        debug!(session = %self.id, status = ?self.status, "session torn down");
        drop(self);
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn resume(&mut self) -> Vec<Event> {
        self.status = SessionStatus::Running;
        self.restart_clock();
        debug!(session = %self.id, elapsed = self.elapsed_secs(), "session resumed");

        let mut events = vec![Event::SessionResumed {
            elapsed_secs: self.elapsed_secs(),
            at: Utc::now(),
        }];
        if let Driver::Breathing { sequencer, .. } = &self.driver {
            if let Some(visual) = sequencer.resume_visual() {
                events.push(Event::VisualUpdated {
                    visual,
                    at: Utc::now(),
                });
            }
        }
        events
    }

    fn complete(&mut self) -> Vec<Event> {
        self.halt_clock();
        self.status = SessionStatus::Completed;

        let completion = Completion {
            session_id: self.id,
            content_id: self.content_id.clone(),
            kind: self.kind,
            activation: self.activation,
            elapsed_secs: self.elapsed_secs(),
        };
        info!(
            session = %self.id,
            content = %self.content_id,
            activation = self.activation,
            "session completed"
        );
        if let Some(hook) = self.on_complete.as_mut() {
            hook(&completion);
        }

        let mut events = vec![Event::SessionCompleted {
            session_id: completion.session_id,
            content_id: completion.content_id,
            activation: completion.activation,
            elapsed_secs: completion.elapsed_secs,
            at: Utc::now(),
        }];
        if matches!(self.driver, Driver::Breathing { .. }) {
            events.push(Event::VisualUpdated {
                visual: Visual::rest(),
                at: Utc::now(),
            });
        }
        events
    }

    fn reposition(&mut self, apply: impl FnOnce(&mut ProgressTracker) -> f64) -> Option<Event> {
        if self.status == SessionStatus::Completed {
            return None;
        }
        let Driver::Playback { tracker, .. } = &mut self.driver else {
            return None;
        };
        let from_secs = tracker.elapsed_secs();
        let to_secs = apply(tracker);
        Some(Event::Seeked {
            from_secs,
            to_secs,
            at: Utc::now(),
        })
    }

    fn rewind(&mut self) {
        match &mut self.driver {
            Driver::Breathing { sequencer, tracker } => {
                sequencer.reset();
                tracker.reset();
            }
            Driver::Playback { tracker, .. } => tracker.reset(),
            Driver::Ambient { timer, played_secs } => {
                timer.rearm();
                *played_secs = 0;
            }
        }
    }

    /// Replace the tick stream; anything still queued from the old one is stale.
    fn restart_clock(&mut self) {
        self.epoch += 1;
        self.clock.start(self.epoch);
    }

    fn halt_clock(&mut self) {
        self.clock.stop();
        self.epoch += 1;
    }
}

impl SessionController<ManualClock> {
    /// Fire up to `ticks` manual-clock ticks, stopping early once the clock
    /// stops (pause, completion).
    pub fn advance_clock(&mut self, ticks: u32) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            let Some(tick) = self.clock.fire() else {
                break;
            };
            events.extend(self.on_tick(tick));
        }
        events
    }
}

impl<C: Clock> Drop for SessionController<C> {
    fn drop(&mut self) {
        self.clock.stop();
    }
}

fn phase_event(transition: PhaseTransition) -> Event {
    Event::PhaseChanged {
        index: transition.index,
        name: transition.name,
        instruction: transition.instruction,
        duration_secs: transition.duration_secs,
        visual: transition.visual,
        at: Utc::now(),
    }
}
