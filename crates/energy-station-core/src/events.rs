//! Session events.
//!
//! Controller commands and ticks return the events they caused. Each one is
//! tagged by `type` and stamped with the time it happened.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{SessionView, Visual};

/// Every state change of a session produces an Event.
/// The view layer renders from them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        content_id: String,
        activation: u64,
        total_secs: Option<u64>,
        at: DateTime<Utc>,
    },
    SessionPaused {
        elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    SessionResumed {
        elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    SessionReset {
        at: DateTime<Utc>,
    },
    /// Emitted once per activation, when elapsed reaches total or the
    /// white-noise timer runs out.
    SessionCompleted {
        session_id: Uuid,
        content_id: String,
        activation: u64,
        elapsed_secs: f64,
        at: DateTime<Utc>,
    },
    /// The breathing sequencer entered a phase.
    PhaseChanged {
        index: usize,
        name: String,
        instruction: String,
        duration_secs: u32,
        visual: Option<Visual>,
        at: DateTime<Utc>,
    },
    /// Breathing circle target changed without a phase change (pause, resume, stop).
    VisualUpdated {
        visual: Visual,
        at: DateTime<Utc>,
    },
    Seeked {
        from_secs: f64,
        to_secs: f64,
        at: DateTime<Utc>,
    },
    SpeedChanged {
        speed: f64,
        at: DateTime<Utc>,
    },
    TimerSelected {
        minutes: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    ContentChanged {
        content_id: String,
        at: DateTime<Utc>,
    },
    StateSnapshot(SessionView),
}

impl Event {
    /// Event name, as written in the `type` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Event::SessionStarted { .. } => "SessionStarted",
            Event::SessionPaused { .. } => "SessionPaused",
            Event::SessionResumed { .. } => "SessionResumed",
            Event::SessionReset { .. } => "SessionReset",
            Event::SessionCompleted { .. } => "SessionCompleted",
            Event::PhaseChanged { .. } => "PhaseChanged",
            Event::VisualUpdated { .. } => "VisualUpdated",
            Event::Seeked { .. } => "Seeked",
            Event::SpeedChanged { .. } => "SpeedChanged",
            Event::TimerSelected { .. } => "TimerSelected",
            Event::ContentChanged { .. } => "ContentChanged",
            Event::StateSnapshot(_) => "StateSnapshot",
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Event::SessionCompleted { .. })
    }
}
