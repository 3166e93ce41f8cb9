//! Rotary (crown) adjustment of the remaining time while paused.

use serde::{Deserialize, Serialize};

/// Changes larger than this many seconds get a haptic click.
pub const DEFAULT_HAPTIC_THRESHOLD_SECS: u64 = 5;

/// Native range and granularity of the rotary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotaryRange {
    pub min_secs: u64,
    pub max_secs: u64,
    pub step_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Default for RotaryRange {
    fn default() -> Self {
        Self {
            min_secs: 0,
            max_secs: 600,
            step_secs: 5,
        }
    }
}

impl RotaryRange {
    /// Snap to the nearest detent at or below `value`, inside the range.
    pub fn snap(&self, value: u64) -> u64 {
        let step = self.step_secs.max(1);
        let clamped = value.clamp(self.min_secs, self.max_secs);
        let snapped = clamped - (clamped - self.min_secs) % step;
        snapped.max(self.min_secs)
    }

    /// One detent from `current`.
    pub fn step(&self, current: u64, direction: Direction) -> u64 {
        let step = self.step_secs.max(1);
        let base = self.snap(current);
        match direction {
            // Off-grid values first land on the detent above them.
            Direction::Up if base < current.min(self.max_secs) => self.snap(base + step),
            Direction::Up => self.snap(base.saturating_add(step)),
            Direction::Down if base < current => base,
            Direction::Down => self.snap(base.saturating_sub(step).max(self.min_secs)),
        }
    }
}

/// Convert a raw rotary reading to whole seconds. `None` for NaN/infinite input.
pub fn seconds_from_raw(raw: f64) -> Option<u64> {
    if !raw.is_finite() {
        return None;
    }
    Some(raw.floor().max(0.0) as u64)
}

pub fn exceeds_haptic_threshold(old_secs: u64, new_secs: u64, threshold_secs: u64) -> bool {
    old_secs.abs_diff(new_secs) > threshold_secs
}
