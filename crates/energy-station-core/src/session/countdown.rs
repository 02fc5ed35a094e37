//! White-noise auto-stop timer.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minutes offered by the timer picker. `0` disables auto-stop.
pub const TIMER_CHOICES: [u32; 4] = [0, 15, 30, 60];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSelection {
    selected_minutes: u32,
    remaining_secs: u64,
}

impl TimerSelection {
    pub fn selected_minutes(&self) -> u32 {
        self.selected_minutes
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_armed(&self) -> bool {
        self.selected_minutes > 0
    }

    /// Pick a timer and restart the countdown from its full length.
    ///
    /// # Errors
    ///
    /// Rejects minutes outside [`TIMER_CHOICES`].
    pub fn select(&mut self, minutes: u32) -> Result<(), ValidationError> {
        if !TIMER_CHOICES.contains(&minutes) {
            return Err(ValidationError::invalid(
                "timer_minutes",
                format!("expected one of {TIMER_CHOICES:?}, got {minutes}"),
            ));
        }
        self.selected_minutes = minutes;
        self.remaining_secs = u64::from(minutes) * 60;
        Ok(())
    }

    /// Restore the full countdown of the current selection.
    pub fn rearm(&mut self) {
        self.remaining_secs = u64::from(self.selected_minutes) * 60;
    }

    /// One second of playback. Returns `true` when the countdown runs out, at
    /// which point the selection falls back to "no timer".
    pub fn tick(&mut self) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.selected_minutes = 0;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_disarmed() {
        let mut t = TimerSelection::default();
        assert!(!t.is_armed());
        assert!(!t.tick());
        assert_eq!(t.remaining_secs(), 0);
    }

    #[test]
    fn rejects_unlisted_minutes() {
        let mut t = TimerSelection::default();
        assert!(t.select(20).is_err());
        assert_eq!(t.selected_minutes(), 0);
    }

    #[test]
    fn fifteen_minutes_counts_down_to_zero() {
        let mut t = TimerSelection::default();
        t.select(15).unwrap();
        assert_eq!(t.remaining_secs(), 900);

        for _ in 0..899 {
            assert!(!t.tick());
        }
        assert_eq!(t.remaining_secs(), 1);
        assert!(t.tick());
        assert_eq!(t.remaining_secs(), 0);
        assert_eq!(t.selected_minutes(), 0);
    }

    #[test]
    fn reselect_restarts_countdown() {
        let mut t = TimerSelection::default();
        t.select(30).unwrap();
        t.tick();
        t.select(30).unwrap();
        assert_eq!(t.remaining_secs(), 1800);
    }
}
