//! Session controller.
//!
//! Owns the (optional) session, the injected collaborators and at most one
//! in-flight workout handle. Every user action or platform callback enters
//! through here and comes back out as a list of [`Event`]s. Invalid
//! transitions produce no events and change nothing.

use chrono::Utc;

use crate::collaborators::{Collaborators, HapticKind, WorkoutSession};
use crate::config::Config;
use crate::error::ValidationError;
use crate::events::{Event, Input, WorkoutSessionState};
use crate::session::{GoalDuration, Session, SessionMode, SessionState};
use crate::timer::DEFAULT_HAPTIC_THRESHOLD_SECS;
use crate::voice::ShortcutDonation;

/// Defaults applied to every new session.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub default_mode: SessionMode,
    pub default_goal: GoalDuration,
    pub auto_start_by_default: bool,
    pub haptic_threshold_secs: u64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_mode: SessionMode::default(),
            default_goal: GoalDuration::default(),
            auto_start_by_default: true,
            haptic_threshold_secs: DEFAULT_HAPTIC_THRESHOLD_SECS,
        }
    }
}

impl From<&Config> for ControllerSettings {
    fn from(config: &Config) -> Self {
        Self {
            default_mode: config.timer.default_mode,
            default_goal: config.default_goal(),
            auto_start_by_default: config.auto_start.enabled,
            haptic_threshold_secs: config.adjustment.haptic_threshold_secs,
        }
    }
}

pub struct SessionController {
    settings: ControllerSettings,
    collaborators: Collaborators,
    /// Queried once from the immersion sensor at construction.
    sensor_available: bool,
    session: Option<Session>,
    workout: Option<Box<dyn WorkoutSession>>,
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("settings", &self.settings)
            .field("sensor_available", &self.sensor_available)
            .field("session", &self.session)
            .field("workout_active", &self.workout.is_some())
            .finish()
    }
}

impl SessionController {
    pub fn new(settings: ControllerSettings, collaborators: Collaborators) -> Self {
        let sensor_available = collaborators.immersion.is_available();
        Self {
            settings,
            collaborators,
            sensor_available,
            session: None,
            workout: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(Session::state)
            .unwrap_or(SessionState::ModeSelect)
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn sensor_available(&self) -> bool {
        self.sensor_available
    }

    pub fn workout_active(&self) -> bool {
        self.workout.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.state() == SessionState::Running
    }

    pub fn snapshot(&self) -> Event {
        let session = self.session.as_ref();
        Event::StateSnapshot {
            state: self.state(),
            mode: session.map(Session::mode),
            goal_secs: session.map(|s| s.goal().total_secs()).unwrap_or(0),
            remaining_secs: session.map(|s| s.engine().remaining_secs()).unwrap_or(0),
            total_secs: session.map(|s| s.engine().total_secs()).unwrap_or(0),
            progress: session.map(|s| s.engine().progress()).unwrap_or(0.0),
            auto_start_armed: session.map(Session::auto_start_armed).unwrap_or(false),
            sensor_available: self.sensor_available,
            at: Utc::now(),
        }
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Apply one inbound event.
    pub fn handle(&mut self, input: Input) -> Vec<Event> {
        match input {
            Input::SelectMode { mode } => self.select_mode(mode),
            Input::SetGoal { minutes, seconds } => {
                self.set_goal(minutes, seconds).unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "goal rejected");
                    Vec::new()
                })
            }
            Input::SetAutoStart { armed } => self.set_auto_start_armed(armed),
            Input::Start => self.start(),
            Input::Tick => self.tick(),
            Input::Pause => self.pause(),
            Input::Resume => self.resume(),
            Input::TogglePause => self.toggle_pause(),
            Input::Reset => self.reset(),
            Input::NewSession => self.new_session(),
            Input::Adjust { value } => self.adjust(value),
            Input::ImmersionDetected => self.on_immersion_detected(),
            Input::VoiceStart { duration_secs } => self.on_voice_start(duration_secs),
            Input::WorkoutStateChanged { state } => self.on_workout_state_changed(state),
            Input::WorkoutFailed { reason } => self.on_workout_failed(&reason),
            Input::Snapshot => vec![self.snapshot()],
        }
    }

    // ── Session setup ────────────────────────────────────────────────

    /// Pick a mode. Creates a fresh session; only allowed before a start.
    pub fn select_mode(&mut self, mode: SessionMode) -> Vec<Event> {
        if !matches!(self.state(), SessionState::ModeSelect | SessionState::GoalSet) {
            tracing::debug!(state = ?self.state(), "mode change ignored mid-session");
            return Vec::new();
        }
        let goal = self
            .session
            .as_ref()
            .map(Session::goal)
            .unwrap_or(self.settings.default_goal);
        // A cold-plunge session carries the user's arm/disarm choice; sauna
        // sessions are always disarmed and say nothing about it.
        let armed = match self.session.as_ref() {
            Some(previous) if previous.mode().uses_water_lock() => previous.auto_start_armed(),
            _ => self.settings.auto_start_by_default && self.sensor_available,
        };
        let session = Session::new(mode, goal, armed, self.settings.haptic_threshold_secs);
        let event = Event::SessionCreated {
            session_id: session.id(),
            mode,
            at: Utc::now(),
        };
        tracing::info!(session = %session.id(), ?mode, "session created");
        self.session = Some(session);
        vec![event]
    }

    pub fn set_goal(&mut self, minutes: u64, seconds: u64) -> Result<Vec<Event>, ValidationError> {
        let goal = GoalDuration::new(minutes, seconds)?;
        Ok(self.replace_goal(goal))
    }

    fn replace_goal(&mut self, goal: GoalDuration) -> Vec<Event> {
        match self.session.as_mut() {
            Some(session) if session.state() == SessionState::GoalSet => {
                if session.goal == goal {
                    return Vec::new();
                }
                session.goal = goal;
                vec![Event::GoalChanged {
                    goal_secs: goal.total_secs(),
                }]
            }
            _ => {
                tracing::debug!(state = ?self.state(), "goal change ignored");
                Vec::new()
            }
        }
    }

    /// Arm or disarm immersion auto-start. Arming needs a working sensor and
    /// a cold-plunge session.
    pub fn set_auto_start_armed(&mut self, armed: bool) -> Vec<Event> {
        let sensor_available = self.sensor_available;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if armed && !(sensor_available && session.mode().uses_water_lock()) {
            tracing::debug!(
                sensor_available,
                mode = ?session.mode(),
                "auto-start not offered here"
            );
            return Vec::new();
        }
        if session.auto_start_armed == armed {
            return Vec::new();
        }
        session.auto_start_armed = armed;
        vec![Event::AutoStartChanged { armed }]
    }

    // ── Countdown ────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        self.begin_countdown("manual")
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let Some(event) = session.engine.tick() else {
            tracing::trace!(state = ?session.state(), "stale tick dropped");
            return Vec::new();
        };
        if let Event::TimerCompleted { total_secs, .. } = &event {
            tracing::info!(session = %session.id(), total_secs, "session completed");
            self.on_completed();
        }
        vec![event]
    }

    pub fn pause(&mut self) -> Vec<Event> {
        self.with_engine(|session| session.engine.pause(), "pause")
    }

    pub fn resume(&mut self) -> Vec<Event> {
        self.with_engine(|session| session.engine.resume(), "resume")
    }

    /// The single play/pause button.
    pub fn toggle_pause(&mut self) -> Vec<Event> {
        match self.state() {
            SessionState::Running => self.pause(),
            SessionState::Paused => self.resume(),
            _ => Vec::new(),
        }
    }

    /// Rotary input while paused.
    pub fn adjust(&mut self, raw: f64) -> Vec<Event> {
        let events = self.with_engine(|session| session.engine.adjust(raw), "adjust");
        if let Some(Event::RemainingAdjusted {
            significant: true, ..
        }) = events.first()
        {
            self.collaborators.haptics.play(HapticKind::Click);
        }
        events
    }

    /// Back to goal selection with a fresh session carrying the same choices.
    /// Resetting a session that hasn't started does nothing.
    pub fn reset(&mut self) -> Vec<Event> {
        let threshold = self.settings.haptic_threshold_secs;
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        if session.state() == SessionState::GoalSet {
            return Vec::new();
        }
        let Some(event) = session.engine.reset() else {
            return Vec::new();
        };
        let renewed = session.renewed(threshold);
        tracing::info!(old = %session.id(), new = %renewed.id(), "session reset");
        let created = Event::SessionCreated {
            session_id: renewed.id(),
            mode: renewed.mode(),
            at: Utc::now(),
        };
        self.session = Some(renewed);
        self.end_workout();
        vec![event, created]
    }

    /// Discard the session entirely and return to mode selection.
    pub fn new_session(&mut self) -> Vec<Event> {
        self.end_workout();
        match self.session.take() {
            Some(session) => {
                tracing::info!(session = %session.id(), "session discarded");
                vec![Event::SessionDiscarded {
                    session_id: session.id(),
                    at: Utc::now(),
                }]
            }
            None => Vec::new(),
        }
    }

    // ── External triggers ────────────────────────────────────────────

    /// Water detected. Starts the countdown when armed and waiting for a start.
    pub fn on_immersion_detected(&mut self) -> Vec<Event> {
        let ready = self.sensor_available
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.auto_start_armed() && s.state() == SessionState::GoalSet);
        if !ready {
            tracing::debug!(state = ?self.state(), "immersion ignored");
            return Vec::new();
        }
        self.begin_countdown("immersion")
    }

    /// "Start via voice" with a duration in seconds.
    pub fn on_voice_start(&mut self, duration_secs: u64) -> Vec<Event> {
        if duration_secs == 0 {
            tracing::debug!("voice start without duration ignored");
            return Vec::new();
        }
        let mut events = Vec::new();
        match self.state() {
            SessionState::ModeSelect => {
                events.extend(self.select_mode(self.settings.default_mode));
            }
            SessionState::GoalSet => {}
            other => {
                tracing::debug!(state = ?other, "voice start ignored mid-session");
                return Vec::new();
            }
        }
        events.extend(self.replace_goal(GoalDuration::from_secs(duration_secs)));
        events.extend(self.begin_countdown("voice"));
        events
    }

    pub fn on_workout_state_changed(&mut self, state: WorkoutSessionState) -> Vec<Event> {
        match state {
            WorkoutSessionState::Ended | WorkoutSessionState::Stopped => {
                if self.workout.take().is_some() {
                    tracing::info!(?state, "workout session ended externally");
                }
            }
            other => tracing::debug!(state = ?other, "workout session state changed"),
        }
        Vec::new()
    }

    pub fn on_workout_failed(&mut self, reason: &str) -> Vec<Event> {
        tracing::warn!(reason, "workout session failed");
        self.workout = None;
        Vec::new()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn with_engine(
        &mut self,
        op: impl FnOnce(&mut Session) -> Option<Event>,
        name: &'static str,
    ) -> Vec<Event> {
        let state = self.state();
        match self.session.as_mut().and_then(op) {
            Some(event) => vec![event],
            None => {
                tracing::debug!(?state, op = name, "ignored");
                Vec::new()
            }
        }
    }

    fn begin_countdown(&mut self, trigger: &'static str) -> Vec<Event> {
        let state = self.state();
        let Some(session) = self.session.as_mut() else {
            tracing::debug!(trigger, "start ignored without a session");
            return Vec::new();
        };
        let goal_secs = session.goal().total_secs();
        let Some(event) = session.engine.start(goal_secs) else {
            tracing::debug!(?state, goal_secs, trigger, "start ignored");
            return Vec::new();
        };
        let mode = session.mode();
        tracing::info!(session = %session.id(), ?mode, goal_secs, trigger, "session started");
        self.on_started(mode, goal_secs);
        vec![event]
    }

    fn on_started(&mut self, mode: SessionMode, goal_secs: u64) {
        self.end_workout();
        match self.collaborators.health.begin(mode.workout_kind(), Utc::now()) {
            Ok(handle) => self.workout = Some(handle),
            Err(e) => tracing::warn!(error = %e, "could not begin workout"),
        }

        let donation = ShortcutDonation::quick_start(goal_secs, mode);
        if let Err(e) = self.collaborators.voice.donate(&donation) {
            tracing::warn!(error = %e, "voice shortcut donation failed");
        }

        if mode.uses_water_lock() {
            self.collaborators.screen_lock.engage();
        }
    }

    fn on_completed(&mut self) {
        self.end_workout();
        self.collaborators.haptics.play(HapticKind::Success);
        self.collaborators.glance.invalidate();
    }

    fn end_workout(&mut self) {
        if let Some(workout) = self.workout.take() {
            if let Err(e) = workout.end(Utc::now()) {
                tracing::warn!(error = %e, "could not end workout");
            }
        }
    }
}
