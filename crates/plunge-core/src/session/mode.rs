use serde::{Deserialize, Serialize};

/// Therapy the session is timing.
///
/// Chosen once per session. Beyond the lookups below it carries no behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    #[default]
    ColdPlunge,
    Sauna,
}

/// Activity type handed to the health recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutActivity {
    Swimming,
    PreparationAndRecovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutLocation {
    Indoor,
    Outdoor,
}

/// Workout classification recorded for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutKind {
    pub activity: WorkoutActivity,
    pub location: WorkoutLocation,
}

impl SessionMode {
    pub const ALL: [SessionMode; 2] = [SessionMode::ColdPlunge, SessionMode::Sauna];

    pub fn label(self) -> &'static str {
        match self {
            SessionMode::ColdPlunge => "Cold Plunge",
            SessionMode::Sauna => "Sauna",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            SessionMode::ColdPlunge => "❄️",
            SessionMode::Sauna => "🔥",
        }
    }

    /// Accent color as a hex string.
    pub fn accent(self) -> &'static str {
        match self {
            SessionMode::ColdPlunge => "#00ffff",
            SessionMode::Sauna => "#ff9500",
        }
    }

    /// Banner shown while the countdown runs.
    pub fn encouragement(self) -> &'static str {
        match self {
            SessionMode::ColdPlunge => "🧊 Stay Strong!",
            SessionMode::Sauna => "🔥 Embrace the Heat!",
        }
    }

    pub fn completion_title(self) -> &'static str {
        match self {
            SessionMode::ColdPlunge => "Champion!",
            SessionMode::Sauna => "Heat Conquered!",
        }
    }

    pub fn completion_subtitle(self) -> &'static str {
        "You did it!"
    }

    pub fn workout_kind(self) -> WorkoutKind {
        match self {
            SessionMode::ColdPlunge => WorkoutKind {
                activity: WorkoutActivity::Swimming,
                location: WorkoutLocation::Outdoor,
            },
            SessionMode::Sauna => WorkoutKind {
                activity: WorkoutActivity::PreparationAndRecovery,
                location: WorkoutLocation::Indoor,
            },
        }
    }

    /// Water lock and immersion auto-start only apply to cold plunges.
    pub fn uses_water_lock(self) -> bool {
        matches!(self, SessionMode::ColdPlunge)
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for SessionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cold_plunge" | "cold" | "plunge" => Ok(SessionMode::ColdPlunge),
            "sauna" => Ok(SessionMode::Sauna),
            other => Err(format!("unknown session mode: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_cold_plunge() {
        assert_eq!(SessionMode::default(), SessionMode::ColdPlunge);
    }

    #[test]
    fn only_cold_plunge_uses_water_lock() {
        assert!(SessionMode::ColdPlunge.uses_water_lock());
        assert!(!SessionMode::Sauna.uses_water_lock());
    }

    #[test]
    fn cold_plunge_records_outdoor_swim() {
        let kind = SessionMode::ColdPlunge.workout_kind();
        assert_eq!(kind.activity, WorkoutActivity::Swimming);
        assert_eq!(kind.location, WorkoutLocation::Outdoor);
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("cold-plunge".parse::<SessionMode>(), Ok(SessionMode::ColdPlunge));
        assert_eq!("Sauna".parse::<SessionMode>(), Ok(SessionMode::Sauna));
        assert!("steam".parse::<SessionMode>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&SessionMode::ColdPlunge).unwrap();
        assert_eq!(json, "\"cold_plunge\"");
    }
}
