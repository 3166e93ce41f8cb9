use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{
    Collaborators, GlanceableSurface, HapticFeedback, HapticKind, HealthRecorder,
    ImmersionSensor, ScreenLock, VoiceShortcut, WorkoutSession,
};
use crate::error::CollaboratorError;
use crate::session::WorkoutKind;
use crate::voice::ShortcutDonation;

/// One observed collaborator call, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum CollaboratorCall {
    WorkoutBegan { kind: WorkoutKind },
    WorkoutEnded,
    GlanceInvalidated,
    Haptic(HapticKind),
    ShortcutDonated(ShortcutDonation),
    ScreenLocked,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Mutex<Vec<CollaboratorCall>>,
    sensor_available: bool,
    fail_health: bool,
    fail_voice: bool,
}

impl Shared {
    fn push(&self, call: CollaboratorCall) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Collaborators that remember every call, for hosts that want to observe
/// the controller's side effects.
#[derive(Debug, Clone)]
pub struct RecordingCollaborators {
    shared: Arc<Shared>,
}

impl RecordingCollaborators {
    pub fn new(sensor_available: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                sensor_available,
                ..Shared::default()
            }),
        }
    }

    /// Health recorder and voice donation both report failures.
    pub fn failing(sensor_available: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                sensor_available,
                fail_health: true,
                fail_voice: true,
                ..Shared::default()
            }),
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        let handle = Arc::new(self.clone());
        Collaborators {
            health: handle.clone(),
            glance: handle.clone(),
            haptics: handle.clone(),
            voice: handle.clone(),
            screen_lock: handle.clone(),
            immersion: handle,
        }
    }

    pub fn calls(&self) -> Vec<CollaboratorCall> {
        lock(&self.shared.calls).clone()
    }

    pub fn count(&self, pred: impl Fn(&CollaboratorCall) -> bool) -> usize {
        lock(&self.shared.calls).iter().filter(|c| pred(c)).count()
    }

    pub fn clear(&self) {
        lock(&self.shared.calls).clear();
    }
}

struct RecordedWorkout {
    shared: Arc<Shared>,
}

impl HealthRecorder for RecordingCollaborators {
    fn begin(
        &self,
        kind: WorkoutKind,
        _start: DateTime<Utc>,
    ) -> Result<Box<dyn WorkoutSession>, CollaboratorError> {
        if self.shared.fail_health {
            return Err(CollaboratorError::new("health", "authorization denied"));
        }
        self.shared.push(CollaboratorCall::WorkoutBegan { kind });
        Ok(Box::new(RecordedWorkout {
            shared: self.shared.clone(),
        }))
    }
}

impl WorkoutSession for RecordedWorkout {
    fn end(self: Box<Self>, _end: DateTime<Utc>) -> Result<(), CollaboratorError> {
        self.shared.push(CollaboratorCall::WorkoutEnded);
        Ok(())
    }
}

impl GlanceableSurface for RecordingCollaborators {
    fn invalidate(&self) {
        self.shared.push(CollaboratorCall::GlanceInvalidated);
    }
}

impl HapticFeedback for RecordingCollaborators {
    fn play(&self, kind: HapticKind) {
        self.shared.push(CollaboratorCall::Haptic(kind));
    }
}

impl VoiceShortcut for RecordingCollaborators {
    fn donate(&self, donation: &ShortcutDonation) -> Result<(), CollaboratorError> {
        if self.shared.fail_voice {
            return Err(CollaboratorError::new("voice", "donation rejected"));
        }
        self.shared.push(CollaboratorCall::ShortcutDonated(donation.clone()));
        Ok(())
    }
}

impl ScreenLock for RecordingCollaborators {
    fn engage(&self) {
        self.shared.push(CollaboratorCall::ScreenLocked);
    }
}

impl ImmersionSensor for RecordingCollaborators {
    fn is_available(&self) -> bool {
        self.shared.sensor_available
    }
}
