//! # Plunge Timer Core Library
//!
//! Core logic for a cold-plunge / sauna countdown timer. Hosts (a watch UI,
//! the bundled CLI) feed user actions and platform callbacks in as
//! [`Input`]s and render the resulting [`Event`]s.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a second-granularity state machine; the caller
//!   delivers `tick()` once per second
//! - **Session Controller**: owns the session aggregate, the injected
//!   collaborators and the single in-flight workout handle
//! - **Runtime**: a tokio task that serializes inputs and ticks and owns the
//!   only tick source
//! - **Collaborators**: health recording, haptics, voice shortcuts, screen lock,
//!   glanceable surface and the immersion sensor, all behind traits
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: timer state machine
//! - [`SessionController`]: session-level transitions and side effects
//! - [`run_session`]: async driver
//! - [`Config`]: application configuration

pub mod collaborators;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod glance;
pub mod runtime;
pub mod session;
pub mod timer;
pub mod voice;

pub use collaborators::{
    Collaborators, GlanceableSurface, HapticFeedback, HapticKind, HealthRecorder,
    ImmersionSensor, ScreenLock, VoiceShortcut, WorkoutSession,
};
#[cfg(any(test, feature = "test-helpers"))]
pub use collaborators::{CollaboratorCall, RecordingCollaborators};
pub use config::Config;
pub use controller::{ControllerSettings, SessionController};
pub use error::{CollaboratorError, ConfigError, CoreError, ValidationError};
pub use events::{load_input_script, parse_input_script, Event, Input, WorkoutSessionState};
pub use glance::GlanceSummary;
pub use runtime::{replay, run_session};
pub use session::{GoalDuration, Session, SessionMode, SessionState};
pub use timer::{CountdownEngine, Direction, RotaryRange, TimerState};
pub use voice::{ShortcutDonation, VoiceCommand};
