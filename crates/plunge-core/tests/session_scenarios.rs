//! End-to-end session scenarios through the controller.

use plunge_core::{
    CollaboratorCall, ControllerSettings, Event, HapticKind, Input, RecordingCollaborators,
    SessionController, SessionMode, SessionState,
};

fn controller(sensor_available: bool) -> (SessionController, RecordingCollaborators) {
    let rec = RecordingCollaborators::new(sensor_available);
    let ctl = SessionController::new(ControllerSettings::default(), rec.collaborators());
    (ctl, rec)
}

fn prepare(ctl: &mut SessionController, mode: SessionMode, minutes: u64, seconds: u64) {
    ctl.handle(Input::SelectMode { mode });
    ctl.handle(Input::SetGoal { minutes, seconds });
}

fn tick_n(ctl: &mut SessionController, n: u64) -> Vec<Event> {
    (0..n).flat_map(|_| ctl.handle(Input::Tick)).collect()
}

fn numbers(ctl: &SessionController) -> (u64, u64, f64) {
    let engine = ctl.session().expect("session").engine();
    (engine.remaining_secs(), engine.total_secs(), engine.progress())
}

#[test]
fn test_two_minute_five_countdown() {
    let (mut ctl, _) = controller(true);
    prepare(&mut ctl, SessionMode::ColdPlunge, 2, 5);
    ctl.handle(Input::Start);
    assert_eq!(numbers(&ctl), (125, 125, 0.0));

    let events = tick_n(&mut ctl, 125);
    assert_eq!(events.len(), 125);
    assert!(matches!(events.last(), Some(Event::TimerCompleted { total_secs: 125, .. })));
    assert_eq!(ctl.state(), SessionState::Completed);
    assert_eq!(numbers(&ctl), (0, 125, 1.0));
}

#[test]
fn test_pause_adjust_resume_to_completion() {
    let (mut ctl, rec) = controller(true);
    prepare(&mut ctl, SessionMode::ColdPlunge, 1, 0);
    ctl.handle(Input::Start);
    tick_n(&mut ctl, 10);
    ctl.handle(Input::Pause);
    assert_eq!(numbers(&ctl).0, 50);

    ctl.handle(Input::Adjust { value: 80.0 });
    let (remaining, total, progress) = numbers(&ctl);
    assert_eq!((remaining, total), (80, 80));
    assert_eq!(progress, 0.0);
    assert_eq!(rec.count(|c| *c == CollaboratorCall::Haptic(HapticKind::Click)), 1);

    ctl.handle(Input::Resume);
    let events = tick_n(&mut ctl, 80);
    assert!(matches!(events.last(), Some(Event::TimerCompleted { total_secs: 80, .. })));
    assert_eq!(ctl.state(), SessionState::Completed);
}

#[test]
fn test_immersion_equals_manual_start() {
    let (mut auto, auto_rec) = controller(true);
    prepare(&mut auto, SessionMode::ColdPlunge, 1, 30);
    let auto_events = auto.handle(Input::ImmersionDetected);

    let (mut manual, manual_rec) = controller(true);
    prepare(&mut manual, SessionMode::ColdPlunge, 1, 30);
    let manual_events = manual.handle(Input::Start);

    assert_eq!(auto_events.len(), 1);
    assert!(matches!(auto_events[0], Event::TimerStarted { goal_secs: 90, .. }));
    assert!(matches!(manual_events[0], Event::TimerStarted { goal_secs: 90, .. }));
    assert_eq!(numbers(&auto), numbers(&manual));
    assert_eq!(auto.state(), manual.state());
    assert_eq!(auto_rec.calls(), manual_rec.calls());
}

#[test]
fn test_immersion_while_disarmed_changes_nothing() {
    let (mut ctl, rec) = controller(true);
    prepare(&mut ctl, SessionMode::ColdPlunge, 1, 30);
    ctl.handle(Input::SetAutoStart { armed: false });
    let before = ctl.session().cloned();

    assert!(ctl.handle(Input::ImmersionDetected).is_empty());
    assert_eq!(ctl.session().cloned(), before);
    assert_eq!(ctl.state(), SessionState::GoalSet);
    assert!(rec.calls().is_empty());
}

#[test]
fn test_unavailable_sensor_never_arms() {
    let (mut ctl, _) = controller(false);
    prepare(&mut ctl, SessionMode::ColdPlunge, 1, 0);
    assert!(ctl.handle(Input::SetAutoStart { armed: true }).is_empty());
    assert!(ctl.handle(Input::ImmersionDetected).is_empty());
    match ctl.handle(Input::Snapshot).remove(0) {
        Event::StateSnapshot {
            sensor_available,
            auto_start_armed,
            ..
        } => {
            assert!(!sensor_available);
            assert!(!auto_start_armed);
        }
        other => panic!("Expected StateSnapshot, got {other:?}"),
    }
}

#[test]
fn test_voice_command_starts_with_its_duration() {
    let (mut ctl, rec) = controller(false);
    let events = ctl.handle(plunge_core::VoiceCommand { duration_secs: 150 }.into());
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimerStarted { goal_secs: 150, .. })));
    assert_eq!(numbers(&ctl), (150, 150, 0.0));
    assert_eq!(
        rec.count(|c| matches!(c, CollaboratorCall::ShortcutDonated(d) if d.duration_secs == 150)),
        1
    );
}

#[test]
fn test_new_session_after_completion() {
    let (mut ctl, _) = controller(true);
    prepare(&mut ctl, SessionMode::Sauna, 0, 2);
    ctl.handle(Input::Start);
    tick_n(&mut ctl, 2);
    assert_eq!(ctl.state(), SessionState::Completed);

    ctl.handle(Input::Reset);
    assert_eq!(ctl.state(), SessionState::GoalSet);
    assert_eq!(ctl.session().unwrap().mode(), SessionMode::Sauna);

    ctl.handle(Input::NewSession);
    assert_eq!(ctl.state(), SessionState::ModeSelect);
}

#[test]
fn test_every_collaborator_failing_keeps_timer_usable() {
    let rec = RecordingCollaborators::failing(true);
    let mut ctl = SessionController::new(ControllerSettings::default(), rec.collaborators());
    prepare(&mut ctl, SessionMode::ColdPlunge, 0, 5);
    ctl.handle(Input::Start);
    ctl.handle(Input::WorkoutFailed {
        reason: "not authorized".into(),
    });
    tick_n(&mut ctl, 2);
    ctl.handle(Input::Pause);
    ctl.handle(Input::Resume);
    tick_n(&mut ctl, 3);
    assert_eq!(ctl.state(), SessionState::Completed);
}
