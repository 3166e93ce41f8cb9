use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::session::{SessionMode, SessionState};

/// Every state change in the system produces an Event.
/// Hosts render from them; the runtime watches them to manage the tick source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionCreated {
        session_id: Uuid,
        mode: SessionMode,
        at: DateTime<Utc>,
    },
    /// Session discarded; back to mode selection.
    SessionDiscarded {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    GoalChanged {
        goal_secs: u64,
    },
    AutoStartChanged {
        armed: bool,
    },
    TimerStarted {
        goal_secs: u64,
        at: DateTime<Utc>,
    },
    Ticked {
        remaining_secs: u64,
        progress: f64,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    RemainingAdjusted {
        from_secs: u64,
        to_secs: u64,
        total_secs: u64,
        /// Change was large enough to deserve a haptic click.
        significant: bool,
    },
    TimerCompleted {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: SessionState,
        mode: Option<SessionMode>,
        goal_secs: u64,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        auto_start_armed: bool,
        sensor_available: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Events after which exactly one fresh tick source must be running.
    pub fn arms_ticker(&self) -> bool {
        matches!(self, Event::TimerStarted { .. } | Event::TimerResumed { .. })
    }
}

/// State reported by the external workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutSessionState {
    NotStarted,
    Prepared,
    Running,
    Paused,
    Stopped,
    Ended,
}

/// Everything that can happen to a session, from the user or the platform.
///
/// The runtime consumes these one at a time on a single task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Input {
    SelectMode { mode: SessionMode },
    SetGoal { minutes: u64, seconds: u64 },
    SetAutoStart { armed: bool },
    Start,
    Tick,
    Pause,
    Resume,
    /// The single play/pause button.
    TogglePause,
    Reset,
    NewSession,
    /// Rotary value while paused.
    Adjust { value: f64 },
    ImmersionDetected,
    VoiceStart { duration_secs: u64 },
    WorkoutStateChanged { state: WorkoutSessionState },
    WorkoutFailed { reason: String },
    Snapshot,
}

/// Parse a JSON-lines input script. Blank lines and `#` comments are skipped.
pub fn parse_input_script(text: &str) -> Result<Vec<Input>, CoreError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| serde_json::from_str(line).map_err(CoreError::from))
        .collect()
}

pub fn load_input_script(path: &std::path::Path) -> Result<Vec<Input>, CoreError> {
    let text = std::fs::read_to_string(path)?;
    parse_input_script(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_start_and_resume_arm_the_ticker() {
        let now = Utc::now();
        assert!(Event::TimerStarted { goal_secs: 5, at: now }.arms_ticker());
        assert!(Event::TimerResumed { remaining_secs: 5, at: now }.arms_ticker());
        assert!(!Event::TimerPaused { remaining_secs: 5, at: now }.arms_ticker());
        assert!(!Event::Ticked { remaining_secs: 4, progress: 0.2 }.arms_ticker());
    }

    #[test]
    fn input_is_tagged_json() {
        let input: Input = serde_json::from_str(r#"{"type":"voice_start","duration_secs":90}"#).unwrap();
        assert_eq!(input, Input::VoiceStart { duration_secs: 90 });

        let json = serde_json::to_value(Input::Adjust { value: 80.0 }).unwrap();
        assert_eq!(json["type"], "adjust");
    }

    #[test]
    fn input_script_skips_comments_and_blanks() {
        let script = r#"
            # warm-up
            {"type":"select_mode","mode":"cold_plunge"}

            {"type":"start"}
        "#;
        let inputs = parse_input_script(script).unwrap();
        assert_eq!(
            inputs,
            vec![Input::SelectMode { mode: SessionMode::ColdPlunge }, Input::Start]
        );
    }

    #[test]
    fn input_script_reports_bad_lines() {
        let err = parse_input_script("{\"type\":\"explode\"}").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn missing_script_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_input_script(&dir.path().join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
