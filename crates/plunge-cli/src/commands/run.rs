//! Interactive session on the terminal.
//!
//! Stdin lines stand in for the watch's buttons, crown and sensors. Events are
//! printed to stdout as JSON lines.

use clap::Args;
use plunge_core::glance::GlanceSummary;
use plunge_core::{
    run_session, Config, Direction, Event, Input, RotaryRange, SessionMode, SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::unbounded_channel;

use super::{build_controller, print_event_line};

const HELP: &str = "commands: start | pause | resume | p (toggle) | + | - | adjust <secs> | \
immerse | voice <secs> | arm | disarm | reset | new | mode <cold-plunge|sauna> | \
goal <min> <sec> | status | quit";

#[derive(Args)]
pub struct RunArgs {
    /// Session mode (cold-plunge or sauna)
    #[arg(long)]
    mode: Option<SessionMode>,
    /// Goal minutes
    #[arg(long)]
    minutes: Option<u64>,
    /// Goal seconds
    #[arg(long)]
    seconds: Option<u64>,
    /// Disarm immersion auto-start for this session
    #[arg(long)]
    no_auto_start: bool,
    /// Report the immersion sensor as unavailable
    #[arg(long)]
    no_sensor: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Send(Input),
    Help,
    Quit,
}

/// Map one stdin line to a command. `remaining` is the last remaining time
/// seen, used for crown detents.
fn parse_line(line: &str, remaining: u64, range: &RotaryRange) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let input = match head {
        "start" | "s" => Input::Start,
        "pause" => Input::Pause,
        "resume" => Input::Resume,
        "p" => Input::TogglePause,
        "+" => Input::Adjust {
            value: range.step(remaining, Direction::Up) as f64,
        },
        "-" => Input::Adjust {
            value: range.step(remaining, Direction::Down) as f64,
        },
        "adjust" | "a" => Input::Adjust {
            value: number(&mut words, head, "seconds")? as f64,
        },
        "immerse" | "i" => Input::ImmersionDetected,
        "voice" | "v" => Input::VoiceStart {
            duration_secs: number(&mut words, head, "seconds")?,
        },
        "arm" => Input::SetAutoStart { armed: true },
        "disarm" => Input::SetAutoStart { armed: false },
        "reset" | "r" => Input::Reset,
        "new" => Input::NewSession,
        "mode" => {
            let mode = words
                .next()
                .ok_or_else(|| "mode needs a name".to_string())?
                .parse::<SessionMode>()?;
            Input::SelectMode { mode }
        }
        "goal" => {
            let minutes = number(&mut words, head, "minutes")?;
            let seconds = number(&mut words, head, "seconds").unwrap_or(0);
            Input::SetGoal { minutes, seconds }
        }
        "status" => Input::Snapshot,
        "help" | "?" => return Ok(Some(Command::Help)),
        "quit" | "q" | "exit" => return Ok(Some(Command::Quit)),
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(Command::Send(input)))
}

fn number<'a>(
    words: &mut impl Iterator<Item = &'a str>,
    head: &str,
    what: &str,
) -> Result<u64, String> {
    words
        .next()
        .ok_or_else(|| format!("{head} needs {what}"))?
        .parse::<u64>()
        .map_err(|e| format!("bad {what}: {e}"))
}

/// Track remaining time from the event stream.
fn remaining_after(event: &Event, current: u64) -> u64 {
    match event {
        Event::TimerStarted { goal_secs, .. } => *goal_secs,
        Event::Ticked { remaining_secs, .. }
        | Event::TimerPaused { remaining_secs, .. }
        | Event::TimerResumed { remaining_secs, .. } => *remaining_secs,
        Event::RemainingAdjusted { to_secs, .. } => *to_secs,
        Event::TimerCompleted { .. } | Event::TimerReset { .. } => 0,
        _ => current,
    }
}

pub async fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mode = args.mode.unwrap_or(config.timer.default_mode);
    let default_goal = config.default_goal();
    let minutes = args.minutes.unwrap_or(default_goal.minutes);
    let seconds = args.seconds.unwrap_or(default_goal.seconds);
    let range = config.rotary_range();

    let controller = build_controller(config, !args.no_sensor);
    let (in_tx, in_rx) = unbounded_channel();
    let (ev_tx, mut ev_rx) = unbounded_channel();
    let session = tokio::spawn(run_session(controller, in_rx, ev_tx));

    in_tx.send(Input::SelectMode { mode })?;
    in_tx.send(Input::SetGoal { minutes, seconds })?;
    if args.no_auto_start {
        in_tx.send(Input::SetAutoStart { armed: false })?;
    }
    in_tx.send(Input::Snapshot)?;
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut remaining = 0u64;
    let mut current_mode = mode;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_line(&line, remaining, &range) {
                    Ok(Some(Command::Send(input))) => {
                        tracing::debug!(?input, "stdin input");
                        in_tx.send(input)?;
                    }
                    Ok(Some(Command::Help)) => eprintln!("{HELP}"),
                    Ok(Some(Command::Quit)) => break,
                    Ok(None) => {}
                    Err(msg) => eprintln!("{msg}"),
                }
            }
            Some(event) = ev_rx.recv() => {
                remaining = remaining_after(&event, remaining);
                match &event {
                    Event::SessionCreated { mode, .. } => current_mode = *mode,
                    Event::TimerCompleted { .. } => {
                        let summary = GlanceSummary::new(SessionState::Completed, Some(current_mode), 0);
                        eprintln!("{} {}", summary.body1, summary.body2);
                    }
                    _ => {}
                }
                print_event_line(&event)?;
            }
        }
    }

    drop(in_tx);
    let controller = session.await?;
    tracing::info!(state = ?controller.state(), "interactive session closed");
    while let Ok(event) = ev_rx.try_recv() {
        print_event_line(&event)?;
    }
    println!("{}", serde_json::to_string(&controller.snapshot())?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str, remaining: u64) -> Result<Option<Command>, String> {
        parse_line(line, remaining, &RotaryRange::default())
    }

    #[test]
    fn parses_buttons() {
        assert_eq!(parse("start", 0), Ok(Some(Command::Send(Input::Start))));
        assert_eq!(parse("p", 0), Ok(Some(Command::Send(Input::TogglePause))));
        assert_eq!(parse("  ", 0), Ok(None));
        assert_eq!(parse("q", 0), Ok(Some(Command::Quit)));
    }

    #[test]
    fn crown_moves_one_detent_from_remaining() {
        assert_eq!(
            parse("+", 50),
            Ok(Some(Command::Send(Input::Adjust { value: 55.0 })))
        );
        assert_eq!(
            parse("-", 52),
            Ok(Some(Command::Send(Input::Adjust { value: 50.0 })))
        );
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            parse("voice 90", 0),
            Ok(Some(Command::Send(Input::VoiceStart { duration_secs: 90 })))
        );
        assert_eq!(
            parse("goal 1 30", 0),
            Ok(Some(Command::Send(Input::SetGoal { minutes: 1, seconds: 30 })))
        );
        assert_eq!(
            parse("mode sauna", 0),
            Ok(Some(Command::Send(Input::SelectMode { mode: SessionMode::Sauna })))
        );
        assert!(parse("adjust", 0).is_err());
        assert!(parse("adjust soon", 0).is_err());
        assert!(parse("jump", 0).is_err());
    }

    #[test]
    fn remaining_follows_events() {
        let now = chrono::Utc::now();
        let mut remaining = 0;
        for event in [
            Event::TimerStarted { goal_secs: 60, at: now },
            Event::Ticked { remaining_secs: 59, progress: 1.0 / 60.0 },
            Event::GoalChanged { goal_secs: 10 },
            Event::RemainingAdjusted { from_secs: 59, to_secs: 80, total_secs: 80, significant: true },
        ] {
            remaining = remaining_after(&event, remaining);
        }
        assert_eq!(remaining, 80);
    }
}
