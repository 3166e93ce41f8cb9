use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::{
    GlanceableSurface, HapticFeedback, HapticKind, HealthRecorder, ImmersionSensor, ScreenLock,
    VoiceShortcut, WorkoutSession,
};
use crate::error::CollaboratorError;
use crate::session::WorkoutKind;
use crate::voice::ShortcutDonation;

/// Health recorder that only logs. Numbers workouts so begin/end pairs line up.
#[derive(Debug, Default)]
pub struct LoggingHealthRecorder {
    next_id: AtomicU64,
}

struct LoggedWorkout {
    id: u64,
    kind: WorkoutKind,
    start: DateTime<Utc>,
}

impl HealthRecorder for LoggingHealthRecorder {
    fn begin(
        &self,
        kind: WorkoutKind,
        start: DateTime<Utc>,
    ) -> Result<Box<dyn WorkoutSession>, CollaboratorError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            workout = id,
            activity = ?kind.activity,
            location = ?kind.location,
            "workout session started"
        );
        Ok(Box::new(LoggedWorkout { id, kind, start }))
    }
}

impl WorkoutSession for LoggedWorkout {
    fn end(self: Box<Self>, end: DateTime<Utc>) -> Result<(), CollaboratorError> {
        let secs = (end - self.start).num_seconds().max(0);
        tracing::info!(
            workout = self.id,
            activity = ?self.kind.activity,
            duration_secs = secs,
            "workout session ended"
        );
        Ok(())
    }
}

pub(super) struct TracingCollaborator {
    pub(super) sensor_available: bool,
}

impl GlanceableSurface for TracingCollaborator {
    fn invalidate(&self) {
        tracing::info!("glance surface invalidated");
    }
}

impl HapticFeedback for TracingCollaborator {
    fn play(&self, kind: HapticKind) {
        tracing::info!(?kind, "haptic");
    }
}

impl VoiceShortcut for TracingCollaborator {
    fn donate(&self, donation: &ShortcutDonation) -> Result<(), CollaboratorError> {
        let payload = serde_json::to_string(donation)
            .map_err(|e| CollaboratorError::new("voice", e.to_string()))?;
        tracing::info!(%payload, "voice shortcut donated");
        Ok(())
    }
}

impl ScreenLock for TracingCollaborator {
    fn engage(&self) {
        tracing::info!("water lock engaged");
    }
}

impl ImmersionSensor for TracingCollaborator {
    fn is_available(&self) -> bool {
        self.sensor_available
    }
}
