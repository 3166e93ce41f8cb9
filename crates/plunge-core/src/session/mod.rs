//! The session aggregate: one therapy session from mode pick to completion.

mod goal;
mod mode;

pub use goal::{format_clock, GoalDuration, MAX_PICKER_MINUTES, MAX_PICKER_SECONDS};
pub use mode::{SessionMode, WorkoutActivity, WorkoutKind, WorkoutLocation};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::timer::{CountdownEngine, TimerState};

/// Where the user is in the flow. `ModeSelect` means no session exists yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    ModeSelect,
    GoalSet,
    Running,
    Paused,
    Completed,
}

impl From<TimerState> for SessionState {
    fn from(state: TimerState) -> Self {
        match state {
            TimerState::GoalSet => SessionState::GoalSet,
            TimerState::Running => SessionState::Running,
            TimerState::Paused => SessionState::Paused,
            TimerState::Completed => SessionState::Completed,
        }
    }
}

/// The single mutable aggregate. Replaced wholesale on reset or new session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: Uuid,
    mode: SessionMode,
    pub(crate) goal: GoalDuration,
    pub(crate) engine: CountdownEngine,
    pub(crate) auto_start_armed: bool,
}

impl Session {
    pub fn new(mode: SessionMode, goal: GoalDuration, auto_start_armed: bool, haptic_threshold_secs: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            goal,
            engine: CountdownEngine::with_haptic_threshold(haptic_threshold_secs),
            auto_start_armed: auto_start_armed && mode.uses_water_lock(),
        }
    }

    /// Fresh session with the same choices, ready to start again.
    pub(crate) fn renewed(&self, haptic_threshold_secs: u64) -> Self {
        Self::new(self.mode, self.goal, self.auto_start_armed, haptic_threshold_secs)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn goal(&self) -> GoalDuration {
        self.goal
    }

    pub fn auto_start_armed(&self) -> bool {
        self.auto_start_armed
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn state(&self) -> SessionState {
        self.engine.state().into()
    }
}
