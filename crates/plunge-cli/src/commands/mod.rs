pub mod config;
pub mod glance;
pub mod run;
pub mod simulate;
pub mod voice;

use plunge_core::{Collaborators, Config, ControllerSettings, Event, SessionController};

/// Controller wired to tracing-backed collaborators.
pub fn build_controller(config: &Config, sensor_available: bool) -> SessionController {
    SessionController::new(
        ControllerSettings::from(config),
        Collaborators::logging(sensor_available),
    )
}

pub fn print_event_line(event: &Event) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
