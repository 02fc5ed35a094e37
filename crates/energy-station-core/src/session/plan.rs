//! What a session plays: built from a catalog item plus user choices.

use serde::{Deserialize, Serialize};

use super::sequencer::Phase;
use crate::content::ContentItem;
use crate::error::ValidationError;

/// Breathing practice lengths offered by the duration picker, in minutes.
pub const BREATHING_MINUTES_CHOICES: [u32; 3] = [5, 10, 15];
pub const DEFAULT_BREATHING_MINUTES: u32 = 10;

/// Playback multipliers offered by the speed menu.
pub const SPEED_PRESETS: [f64; 6] = [0.5, 0.75, 1.0, 1.25, 1.5, 2.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SessionPlan {
    /// Phase cycling under an overall countdown.
    Breathing { phases: Vec<Phase>, total_secs: u64 },
    /// Linear playback of a fixed-length recording (meditation, mindfulness).
    Playback { total_secs: u64, speed: f64 },
    /// Open-ended loop with an optional auto-stop timer (white noise).
    Ambient,
}

impl SessionPlan {
    pub fn breathing(phases: Vec<Phase>, total_secs: u64) -> Self {
        SessionPlan::Breathing { phases, total_secs }
    }

    pub fn playback(total_secs: u64) -> Self {
        SessionPlan::Playback {
            total_secs,
            speed: 1.0,
        }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            SessionPlan::Breathing { .. } => "breathing",
            SessionPlan::Playback { .. } => "playback",
            SessionPlan::Ambient => "ambient",
        }
    }

    /// Default plan for a catalog item.
    pub fn for_content(item: &ContentItem) -> Self {
        match item {
            ContentItem::Meditation(c) => Self::playback(u64::from(c.duration_min) * 60),
            ContentItem::Mindfulness(c) => Self::playback(c.audio_secs),
            ContentItem::Breathing(c) => Self::breathing(
                c.phases.clone(),
                u64::from(DEFAULT_BREATHING_MINUTES) * 60,
            ),
            ContentItem::WhiteNoise(_) => SessionPlan::Ambient,
        }
    }

    /// Override the overall length of a breathing plan, in minutes.
    ///
    /// # Errors
    ///
    /// Rejects minutes outside [`BREATHING_MINUTES_CHOICES`] and non-breathing plans.
    pub fn with_breathing_minutes(self, minutes: u32) -> Result<Self, ValidationError> {
        validate_breathing_minutes(minutes)?;
        match self {
            SessionPlan::Breathing { phases, .. } => Ok(SessionPlan::Breathing {
                phases,
                total_secs: u64::from(minutes) * 60,
            }),
            _ => Err(ValidationError::invalid(
                "minutes",
                "practice length only applies to breathing sessions",
            )),
        }
    }

    /// Override the playback speed of a playback plan.
    ///
    /// # Errors
    ///
    /// Rejects non-positive or non-finite speeds and non-playback plans.
    pub fn with_speed(self, speed: f64) -> Result<Self, ValidationError> {
        validate_speed(speed)?;
        match self {
            SessionPlan::Playback { total_secs, .. } => Ok(SessionPlan::Playback { total_secs, speed }),
            _ => Err(ValidationError::invalid(
                "speed",
                "speed only applies to playback sessions",
            )),
        }
    }
}

pub fn validate_speed(speed: f64) -> Result<(), ValidationError> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "speed",
            format!("must be a positive number, got {speed}"),
        ))
    }
}

pub fn validate_breathing_minutes(minutes: u32) -> Result<(), ValidationError> {
    if BREATHING_MINUTES_CHOICES.contains(&minutes) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            "minutes",
            format!("expected one of {BREATHING_MINUTES_CHOICES:?}, got {minutes}"),
        ))
    }
}
