//! Countdown engine.
//!
//! A second-granularity state machine. It owns no timer: the caller delivers
//! `tick()` once per second while the engine is `Running`, and every handler
//! checks the current state first, so a tick that arrives after a pause,
//! reset or completion is simply dropped.
//!
//! ## State Transitions
//!
//! ```text
//! GoalSet -> Running <-> Paused
//!               |
//!               v
//!           Completed
//! (reset: any -> GoalSet)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = CountdownEngine::new();
//! engine.start(125);
//! // once per second:
//! engine.tick(); // Some(Event::TimerCompleted { .. }) on the last one
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::adjust::{exceeds_haptic_threshold, seconds_from_raw, DEFAULT_HAPTIC_THRESHOLD_SECS};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
    GoalSet,
    Running,
    Paused,
    /// Terminal until reset.
    Completed,
}

/// Core countdown engine.
///
/// Invariant once started: `remaining_secs <= total_secs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownEngine {
    state: TimerState,
    remaining_secs: u64,
    /// High-water mark of the countdown; only grows after start.
    total_secs: u64,
    haptic_threshold_secs: u64,
}

impl Default for CountdownEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownEngine {
    pub fn new() -> Self {
        Self::with_haptic_threshold(DEFAULT_HAPTIC_THRESHOLD_SECS)
    }

    pub fn with_haptic_threshold(haptic_threshold_secs: u64) -> Self {
        Self {
            state: TimerState::GoalSet,
            remaining_secs: 0,
            total_secs: 0,
            haptic_threshold_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// 0.0 .. 1.0 elapsed fraction. Zero when nothing has been started.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        let elapsed = self.total_secs.saturating_sub(self.remaining_secs);
        (elapsed as f64 / self.total_secs as f64).clamp(0.0, 1.0)
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self, goal_secs: u64) -> Option<Event> {
        if self.state != TimerState::GoalSet || goal_secs == 0 {
            return None;
        }
        self.total_secs = goal_secs;
        self.remaining_secs = goal_secs;
        self.state = TimerState::Running;
        Some(Event::TimerStarted {
            goal_secs,
            at: Utc::now(),
        })
    }

    /// One second elapsed. Returns `TimerCompleted` on the tick that reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.complete());
        }
        Some(Event::Ticked {
            remaining_secs: self.remaining_secs,
            progress: self.progress(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused || self.remaining_secs == 0 {
            return None;
        }
        self.state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Back to goal selection. A second reset is a no-op.
    pub fn reset(&mut self) -> Option<Event> {
        if self.is_pristine() {
            return None;
        }
        self.state = TimerState::GoalSet;
        self.remaining_secs = 0;
        self.total_secs = 0;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Dial the remaining time while paused. Ignored in every other state.
    pub fn adjust(&mut self, raw: f64) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        let new_secs = seconds_from_raw(raw)?;
        let old_secs = self.remaining_secs;
        self.remaining_secs = new_secs;
        self.total_secs = self.total_secs.max(new_secs);
        Some(Event::RemainingAdjusted {
            from_secs: old_secs,
            to_secs: new_secs,
            total_secs: self.total_secs,
            significant: exceeds_haptic_threshold(old_secs, new_secs, self.haptic_threshold_secs),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete(&mut self) -> Event {
        self.state = TimerState::Completed;
        self.remaining_secs = 0;
        Event::TimerCompleted {
            total_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    fn is_pristine(&self) -> bool {
        self.state == TimerState::GoalSet && self.remaining_secs == 0 && self.total_secs == 0
    }
}
