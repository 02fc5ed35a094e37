//! Breathing phase sequencer.
//!
//! Cycles through an exercise's phases one tick at a time. Each phase entry
//! produces a [`PhaseTransition`] carrying the visual target the breathing
//! circle should animate to over the phase.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Circle scale at rest and at the end of an exhale.
pub const REST_SCALE: f32 = 1.0;
/// Circle scale at the end of an inhale and during a hold.
pub const EXPANDED_SCALE: f32 = 1.3;

/// A named, timed segment of a breathing exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub duration_secs: u32,
    #[serde(default)]
    pub instruction: String,
}

impl Phase {
    pub fn new(name: impl Into<String>, duration_secs: u32, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration_secs,
            instruction: instruction.into(),
        }
    }

    pub fn kind(&self) -> PhaseKind {
        PhaseKind::classify(&self.name)
    }
}

/// Breathing movement of a phase, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseKind {
    Inhale,
    Hold,
    Exhale,
    /// Name matches no known movement; the circle is left untouched.
    Other,
}

impl PhaseKind {
    /// Classify by substring, so variants such as "左鼻吸气" (left-nostril
    /// inhale) resolve to their movement.
    pub fn classify(name: &str) -> Self {
        let lower = name.to_lowercase();
        if name.contains("吸气") || lower.contains("inhale") {
            PhaseKind::Inhale
        } else if name.contains("屏息") || lower.contains("hold") {
            PhaseKind::Hold
        } else if name.contains("呼气") || lower.contains("exhale") {
            PhaseKind::Exhale
        } else {
            PhaseKind::Other
        }
    }

    /// Visual target for a phase of this kind lasting `duration_ms`.
    pub fn visual(self, duration_ms: u64) -> Option<Visual> {
        match self {
            PhaseKind::Inhale => Some(Visual {
                target_scale: EXPANDED_SCALE,
                target_color: 1.0,
                transition_ms: duration_ms,
            }),
            PhaseKind::Hold => Some(Visual {
                target_scale: EXPANDED_SCALE,
                target_color: 1.0,
                transition_ms: 0,
            }),
            PhaseKind::Exhale => Some(Visual {
                target_scale: REST_SCALE,
                target_color: 0.0,
                transition_ms: duration_ms,
            }),
            PhaseKind::Other => None,
        }
    }
}

/// Animation target for the breathing circle.
///
/// `transition_ms == 0` means snap to the target without animating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Visual {
    pub target_scale: f32,
    pub target_color: f32,
    pub transition_ms: u64,
}

impl Visual {
    /// Resting circle, shown while idle or paused.
    pub fn rest() -> Self {
        Self {
            target_scale: REST_SCALE,
            target_color: 0.0,
            transition_ms: 0,
        }
    }
}

/// Emitted whenever the sequencer enters a phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub index: usize,
    pub name: String,
    pub instruction: String,
    pub duration_secs: u32,
    pub visual: Option<Visual>,
}

/// Cyclic phase state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseSequencer {
    phases: Vec<Phase>,
    index: usize,
    /// Seconds left in the current phase.
    phase_remaining: u32,
    /// Full passes through the phase list since the last start/reset.
    cycles: u64,
}

impl PhaseSequencer {
    /// Build a sequencer positioned at phase 0.
    ///
    /// # Errors
    ///
    /// Rejects an empty phase list and phases with zero duration.
    pub fn new(phases: Vec<Phase>) -> Result<Self, ValidationError> {
        let first = phases
            .first()
            .ok_or_else(|| ValidationError::EmptyCollection("breathing phases".into()))?;
        if let Some(bad) = phases.iter().find(|p| p.duration_secs == 0) {
            return Err(ValidationError::invalid(
                "duration_secs",
                format!("phase '{}' must last at least one second", bad.name),
            ));
        }
        let phase_remaining = first.duration_secs;
        Ok(Self {
            phases,
            index: 0,
            phase_remaining,
            cycles: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn current(&self) -> &Phase {
        &self.phases[self.index]
    }

    pub fn phase_remaining_secs(&self) -> u32 {
        self.phase_remaining
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles
    }

    /// Total seconds of one pass through every phase.
    pub fn cycle_secs(&self) -> u64 {
        self.phases.iter().map(|p| u64::from(p.duration_secs)).sum()
    }

    /// Visual for continuing the current phase from where it stopped.
    pub fn resume_visual(&self) -> Option<Visual> {
        self.current()
            .kind()
            .visual(u64::from(self.phase_remaining) * 1000)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter phase 0 with a full countdown.
    pub fn start(&mut self) -> PhaseTransition {
        self.reset();
        self.transition()
    }

    /// One second elapsed. Returns the transition when the phase expired.
    pub fn tick(&mut self) -> Option<PhaseTransition> {
        self.phase_remaining = self.phase_remaining.saturating_sub(1);
        if self.phase_remaining == 0 {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Move to the next phase, wrapping after the last.
    pub fn advance(&mut self) -> PhaseTransition {
        self.index = (self.index + 1) % self.phases.len();
        if self.index == 0 {
            self.cycles += 1;
        }
        self.phase_remaining = self.phases[self.index].duration_secs;
        self.transition()
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.cycles = 0;
        self.phase_remaining = self.phases[0].duration_secs;
    }

    fn transition(&self) -> PhaseTransition {
        let phase = self.current();
        PhaseTransition {
            index: self.index,
            name: phase.name.clone(),
            instruction: phase.instruction.clone(),
            duration_secs: phase.duration_secs,
            visual: phase.kind().visual(u64::from(phase.duration_secs) * 1000),
        }
    }
}
