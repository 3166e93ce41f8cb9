//! Content for the always-on glanceable surface.
//!
//! The surface itself is external; this only decides what text it should
//! show for a given session state and how far ahead its timeline reaches.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{format_clock, SessionMode, SessionState};

/// How far ahead timeline entries are provided.
pub const TIMELINE_HORIZON_HOURS: i64 = 4;

/// Header plus two body lines, the richest layout the surface offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlanceSummary {
    pub header: String,
    pub body1: String,
    pub body2: String,
}

impl GlanceSummary {
    pub fn new(state: SessionState, mode: Option<SessionMode>, remaining_secs: u64) -> Self {
        let mode = mode.unwrap_or_default();
        let header = format!("{} {} Timer", mode.icon(), mode.label());
        let (body1, body2) = match state {
            SessionState::ModeSelect | SessionState::GoalSet => (
                format!("Ready for {}", mode.label().to_lowercase()),
                "Tap to start session".to_string(),
            ),
            SessionState::Running => (
                format!("{} left", format_clock(remaining_secs)),
                mode.encouragement().to_string(),
            ),
            SessionState::Paused => (
                format!("{} left", format_clock(remaining_secs)),
                "Paused".to_string(),
            ),
            SessionState::Completed => (
                mode.completion_title().to_string(),
                mode.completion_subtitle().to_string(),
            ),
        };
        Self {
            header,
            body1,
            body2,
        }
    }
}

/// When the timeline ends, counted from `now`.
pub fn timeline_end(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::hours(TIMELINE_HORIZON_HOURS)
}

/// Hourly entry dates after `after`, at most `limit` and never past the horizon.
pub fn timeline_entry_dates(after: DateTime<Utc>, limit: usize) -> Vec<DateTime<Utc>> {
    let count = limit.min(TIMELINE_HORIZON_HOURS as usize);
    (1..=count as i64)
        .map(|i| after + Duration::hours(i))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_summary_invites_a_start() {
        let summary = GlanceSummary::new(SessionState::ModeSelect, None, 0);
        assert_eq!(summary.header, "❄️ Cold Plunge Timer");
        assert_eq!(summary.body1, "Ready for cold plunge");
        assert_eq!(summary.body2, "Tap to start session");
    }

    #[test]
    fn running_summary_shows_remaining() {
        let summary = GlanceSummary::new(SessionState::Running, Some(SessionMode::Sauna), 95);
        assert_eq!(summary.body1, "1:35 left");
        assert_eq!(summary.body2, SessionMode::Sauna.encouragement());
    }

    #[test]
    fn timeline_is_hourly_and_capped() {
        let now = Utc::now();
        let dates = timeline_entry_dates(now, 10);
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], now + Duration::hours(1));
        assert_eq!(*dates.last().unwrap(), timeline_end(now));

        assert_eq!(timeline_entry_dates(now, 2).len(), 2);
        assert!(timeline_entry_dates(now, 0).is_empty());
    }
}
