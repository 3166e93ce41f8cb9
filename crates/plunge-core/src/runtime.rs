//! Single-task session runtime.
//!
//! Consumes inbound [`Input`]s and the one-second tick on the same task, so
//! the controller is never touched concurrently. The runtime owns the only
//! tick source: an `Interval` that is replaced on every start/resume and
//! dropped as soon as the session stops running.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

use crate::controller::SessionController;
use crate::events::{Event, Input};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Fresh tick source. First tick one full period from now; missed ticks
/// are not replayed.
fn new_ticker() -> Interval {
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(t) => {
            t.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Drive `controller` until every input sender is dropped, then hand it back.
///
/// Produced events are forwarded to `events`; a closed event receiver is not
/// an error, the session keeps running without an audience.
pub async fn run_session(
    mut controller: SessionController,
    mut inputs: UnboundedReceiver<Input>,
    events: UnboundedSender<Event>,
) -> SessionController {
    let mut ticker: Option<Interval> = None;

    loop {
        let input = tokio::select! {
            input = inputs.recv() => match input {
                Some(input) => input,
                None => break,
            },
            _ = next_tick(&mut ticker) => Input::Tick,
        };

        let produced = controller.handle(input);

        if produced.iter().any(Event::arms_ticker) {
            // Replace, never add: at most one tick source per session.
            ticker = Some(new_ticker());
        }
        if !controller.is_running() {
            ticker = None;
        }

        for event in produced {
            let _ = events.send(event);
        }
    }

    tracing::debug!(state = ?controller.state(), "session runtime stopped");
    controller
}

/// Feed inputs straight through, without a clock. Ticks must be part of
/// `inputs`; used for scripted and simulated sessions.
pub fn replay(
    controller: &mut SessionController,
    inputs: impl IntoIterator<Item = Input>,
) -> Vec<Event> {
    inputs
        .into_iter()
        .flat_map(|input| controller.handle(input))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::Collaborators;
    use crate::controller::ControllerSettings;
    use crate::session::{SessionMode, SessionState};
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test(start_paused = true)]
    async fn ticks_stop_when_input_closes() {
        let ctl = SessionController::new(ControllerSettings::default(), Collaborators::noop());
        let (in_tx, in_rx) = unbounded_channel();
        let (ev_tx, mut ev_rx) = unbounded_channel();
        let handle = tokio::spawn(run_session(ctl, in_rx, ev_tx));

        in_tx.send(Input::SelectMode { mode: SessionMode::Sauna }).unwrap();
        in_tx.send(Input::SetGoal { minutes: 0, seconds: 3 }).unwrap();
        in_tx.send(Input::Start).unwrap();

        let mut ticks = 0;
        while let Some(event) = ev_rx.recv().await {
            match event {
                Event::Ticked { .. } => ticks += 1,
                Event::TimerCompleted { .. } => break,
                _ => {}
            }
        }
        assert_eq!(ticks, 2);

        drop(in_tx);
        let ctl = handle.await.unwrap();
        assert_eq!(ctl.state(), SessionState::Completed);
    }

    #[test]
    fn replay_applies_inputs_in_order() {
        let mut ctl = SessionController::new(ControllerSettings::default(), Collaborators::noop());
        let events = replay(
            &mut ctl,
            [
                Input::VoiceStart { duration_secs: 2 },
                Input::Tick,
                Input::Tick,
                Input::Tick,
            ],
        );
        assert!(matches!(events.last(), Some(Event::TimerCompleted { total_secs: 2, .. })));
        assert_eq!(ctl.state(), SessionState::Completed);
    }
}
