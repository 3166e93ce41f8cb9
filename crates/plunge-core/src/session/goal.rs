use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const MAX_PICKER_MINUTES: u64 = 10;
pub const MAX_PICKER_SECONDS: u64 = 59;

/// Goal duration as picked on the two wheels (minutes, seconds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDuration {
    pub minutes: u64,
    pub seconds: u64,
}

impl GoalDuration {
    /// Build a goal from picker values, rejecting anything the wheels can't show.
    pub fn new(minutes: u64, seconds: u64) -> Result<Self, ValidationError> {
        if minutes > MAX_PICKER_MINUTES {
            return Err(ValidationError::OutOfRange {
                field: "minutes",
                value: minutes,
                min: 0,
                max: MAX_PICKER_MINUTES,
            });
        }
        if seconds > MAX_PICKER_SECONDS {
            return Err(ValidationError::OutOfRange {
                field: "seconds",
                value: seconds,
                min: 0,
                max: MAX_PICKER_SECONDS,
            });
        }
        Ok(Self { minutes, seconds })
    }

    /// Split a raw duration. Not bounded by the picker ranges (voice commands).
    pub fn from_secs(total: u64) -> Self {
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    pub fn total_secs(&self) -> u64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.total_secs() == 0
    }
}

impl Default for GoalDuration {
    fn default() -> Self {
        Self {
            minutes: 2,
            seconds: 0,
        }
    }
}

impl std::fmt::Display for GoalDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_clock(self.total_secs()))
    }
}

/// `m:ss`, minutes unpadded.
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picker_bounds_are_enforced() {
        assert!(GoalDuration::new(10, 59).is_ok());
        assert!(GoalDuration::new(11, 0).is_err());
        assert!(GoalDuration::new(0, 60).is_err());
    }

    #[test]
    fn total_secs_combines_wheels() {
        assert_eq!(GoalDuration::new(2, 5).unwrap().total_secs(), 125);
        assert!(GoalDuration::new(0, 0).unwrap().is_zero());
    }

    #[test]
    fn from_secs_is_unbounded() {
        let goal = GoalDuration::from_secs(15 * 60 + 7);
        assert_eq!(goal.minutes, 15);
        assert_eq!(goal.seconds, 7);
        assert_eq!(goal.total_secs(), 907);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(GoalDuration::default().to_string(), "2:00");
    }
}
