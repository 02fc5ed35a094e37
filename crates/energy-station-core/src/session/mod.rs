//! Practice session engine.
//!
//! - [`PhaseSequencer`]: cyclic breathing phases with visual targets
//! - [`ProgressTracker`]: elapsed vs. total for linear playback
//! - [`TimerSelection`]: white-noise auto-stop countdown
//! - [`SessionController`]: play/pause/reset state machine composing the
//!   above with a [`Clock`](crate::clock::Clock)

mod controller;
mod countdown;
mod plan;
mod sequencer;
mod tracker;

pub use controller::{Completion, PhaseView, SessionController, SessionStatus, SessionView};
pub use countdown::{TimerSelection, TIMER_CHOICES};
pub use plan::{
    validate_breathing_minutes, validate_speed, SessionPlan, BREATHING_MINUTES_CHOICES,
    DEFAULT_BREATHING_MINUTES, SPEED_PRESETS,
};
pub use sequencer::{
    Phase, PhaseKind, PhaseSequencer, PhaseTransition, Visual, EXPANDED_SCALE, REST_SCALE,
};
pub use tracker::{ProgressTracker, SKIP_STEP_SECS};

/// Format seconds as `MM:SS`, dropping any fraction.
pub fn format_clock(secs: f64) -> String {
    let whole = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
