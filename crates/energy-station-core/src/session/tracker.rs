//! Linear playback progress.
//!
//! Tracks elapsed seconds against a fixed total. Elapsed is fractional so a
//! playback speed of 1.5 advances by exactly 1.5 per tick.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Relative jump used by the skip-forward / skip-back buttons.
pub const SKIP_STEP_SECS: f64 = 10.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressTracker {
    elapsed: f64,
    total: u64,
    /// Set once elapsed first reaches total; cleared only by `reset`.
    completed: bool,
}

impl ProgressTracker {
    /// # Errors
    ///
    /// Rejects a zero total.
    pub fn new(total_secs: u64) -> Result<Self, ValidationError> {
        if total_secs == 0 {
            return Err(ValidationError::invalid(
                "total_secs",
                "session length must be greater than zero",
            ));
        }
        Ok(Self {
            elapsed: 0.0,
            total: total_secs,
            completed: false,
        })
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed
    }

    pub fn total_secs(&self) -> u64 {
        self.total
    }

    pub fn remaining_secs(&self) -> f64 {
        (self.total as f64 - self.elapsed).max(0.0)
    }

    /// 0.0 .. 100.0
    pub fn progress_pct(&self) -> f64 {
        (self.elapsed / self.total as f64 * 100.0).min(100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Add `delta` seconds. Returns `true` on the call that reaches the end,
    /// and only on that call.
    ///
    /// Negative or non-finite deltas are ignored.
    pub fn advance(&mut self, delta: f64) -> bool {
        if self.completed {
            return false;
        }
        if delta.is_finite() && delta > 0.0 {
            self.elapsed += delta;
        }
        if self.elapsed >= self.total as f64 {
            self.elapsed = self.total as f64;
            self.completed = true;
            return true;
        }
        false
    }

    /// Jump to an absolute position, clamped to `[0, total]`.
    /// Returns the position actually applied.
    pub fn seek_to(&mut self, position: f64) -> f64 {
        if !position.is_nan() {
            self.elapsed = position.clamp(0.0, self.total as f64);
        }
        self.elapsed
    }

    /// Jump relative to the current position, clamped to `[0, total]`.
    pub fn skip(&mut self, delta: f64) -> f64 {
        self.seek_to(self.elapsed + delta)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.completed = false;
    }
}
