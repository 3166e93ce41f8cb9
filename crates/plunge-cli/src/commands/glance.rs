use chrono::Utc;
use plunge_core::glance::{timeline_end, timeline_entry_dates, GlanceSummary};
use plunge_core::SessionState;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now();
    let output = serde_json::json!({
        "summary": GlanceSummary::new(SessionState::ModeSelect, None, 0),
        "timeline": timeline_entry_dates(now, usize::MAX),
        "timeline_end": timeline_end(now),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
