//! Voice-shortcut payloads: what gets donated on start and what comes back
//! when the user invokes the shortcut.

use serde::{Deserialize, Serialize};

use crate::events::Input;
use crate::session::SessionMode;

pub const START_ACTIVITY_TYPE: &str = "com.plungetimer.start";

/// Activity donated to the voice assistant so it can suggest a quick start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutDonation {
    pub activity_type: String,
    pub title: String,
    pub suggested_phrase: String,
    pub duration_secs: u64,
    pub mode: SessionMode,
    pub eligible_for_prediction: bool,
    pub eligible_for_search: bool,
}

impl ShortcutDonation {
    pub fn quick_start(duration_secs: u64, mode: SessionMode) -> Self {
        let (title, phrase) = match mode {
            SessionMode::ColdPlunge => ("Start Cold Plunge Timer", "Start my cold plunge"),
            SessionMode::Sauna => ("Start Sauna Timer", "Start my sauna session"),
        };
        Self {
            activity_type: START_ACTIVITY_TYPE.to_string(),
            title: title.to_string(),
            suggested_phrase: phrase.to_string(),
            duration_secs,
            mode,
            eligible_for_prediction: true,
            eligible_for_search: true,
        }
    }
}

/// Inbound "start via voice" request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCommand {
    pub duration_secs: u64,
}

impl From<VoiceCommand> for Input {
    fn from(cmd: VoiceCommand) -> Self {
        Input::VoiceStart {
            duration_secs: cmd.duration_secs,
        }
    }
}
