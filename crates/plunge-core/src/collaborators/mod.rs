//! Capability interfaces the session controller calls into.
//!
//! Each collaborator is fire-and-forget from the controller's point of view:
//! a failure is logged and the countdown carries on. Handles are injected
//! once, at controller construction.

mod logging;
#[cfg(any(test, feature = "test-helpers"))]
mod recording;

pub use logging::LoggingHealthRecorder;
#[cfg(any(test, feature = "test-helpers"))]
pub use recording::{CollaboratorCall, RecordingCollaborators};

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CollaboratorError;
use crate::session::WorkoutKind;
use crate::voice::ShortcutDonation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticKind {
    Success,
    Click,
}

/// Records the session as a workout in the user's health data.
pub trait HealthRecorder: Send + Sync {
    fn begin(
        &self,
        kind: WorkoutKind,
        start: DateTime<Utc>,
    ) -> Result<Box<dyn WorkoutSession>, CollaboratorError>;
}

/// An in-flight workout. Ending consumes it.
pub trait WorkoutSession: Send {
    fn end(self: Box<Self>, end: DateTime<Utc>) -> Result<(), CollaboratorError>;
}

/// Always-on summary widget.
pub trait GlanceableSurface: Send + Sync {
    /// Content is stale; reload the timeline.
    fn invalidate(&self);
}

pub trait HapticFeedback: Send + Sync {
    fn play(&self, kind: HapticKind);
}

pub trait VoiceShortcut: Send + Sync {
    fn donate(&self, donation: &ShortcutDonation) -> Result<(), CollaboratorError>;
}

/// Locks the touch screen while submerged.
pub trait ScreenLock: Send + Sync {
    fn engage(&self);
}

pub trait ImmersionSensor: Send + Sync {
    /// Whether water detection works on this device at all.
    fn is_available(&self) -> bool;
}

/// Every collaborator handle the controller needs.
#[derive(Clone)]
pub struct Collaborators {
    pub health: Arc<dyn HealthRecorder>,
    pub glance: Arc<dyn GlanceableSurface>,
    pub haptics: Arc<dyn HapticFeedback>,
    pub voice: Arc<dyn VoiceShortcut>,
    pub screen_lock: Arc<dyn ScreenLock>,
    pub immersion: Arc<dyn ImmersionSensor>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("sensor_available", &self.immersion.is_available())
            .finish_non_exhaustive()
    }
}

impl Collaborators {
    /// Does nothing; the sensor reports unavailable.
    pub fn noop() -> Self {
        let noop = Arc::new(Noop);
        Self {
            health: noop.clone(),
            glance: noop.clone(),
            haptics: noop.clone(),
            voice: noop.clone(),
            screen_lock: noop.clone(),
            immersion: noop,
        }
    }

    /// Writes every call to the `tracing` log. `sensor_available` sets the
    /// immersion capability.
    pub fn logging(sensor_available: bool) -> Self {
        let log = Arc::new(logging::TracingCollaborator { sensor_available });
        Self {
            health: Arc::new(LoggingHealthRecorder::default()),
            glance: log.clone(),
            haptics: log.clone(),
            voice: log.clone(),
            screen_lock: log.clone(),
            immersion: log,
        }
    }
}

struct Noop;

struct NoopWorkout;

impl HealthRecorder for Noop {
    fn begin(
        &self,
        _kind: WorkoutKind,
        _start: DateTime<Utc>,
    ) -> Result<Box<dyn WorkoutSession>, CollaboratorError> {
        Ok(Box::new(NoopWorkout))
    }
}

impl WorkoutSession for NoopWorkout {
    fn end(self: Box<Self>, _end: DateTime<Utc>) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl GlanceableSurface for Noop {
    fn invalidate(&self) {}
}

impl HapticFeedback for Noop {
    fn play(&self, _kind: HapticKind) {}
}

impl VoiceShortcut for Noop {
    fn donate(&self, _donation: &ShortcutDonation) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

impl ScreenLock for Noop {
    fn engage(&self) {}
}

impl ImmersionSensor for Noop {
    fn is_available(&self) -> bool {
        false
    }
}
