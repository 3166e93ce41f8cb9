use std::path::PathBuf;

use clap::Args;
use plunge_core::{
    load_input_script, replay, Config, GoalDuration, Input, RotaryRange, SessionMode,
};

use super::{build_controller, print_event_line};

#[derive(Args)]
pub struct SimulateArgs {
    /// Goal in seconds
    #[arg(long)]
    goal: Option<u64>,
    /// Session mode (cold-plunge or sauna)
    #[arg(long)]
    mode: Option<SessionMode>,
    /// Number of ticks to deliver; runs to completion when omitted
    #[arg(long)]
    ticks: Option<u64>,
    /// Pause after this many ticks
    #[arg(long)]
    pause_after: Option<u64>,
    /// Rotary value to dial in while paused
    #[arg(long, requires = "pause_after", allow_hyphen_values = true)]
    adjust: Option<f64>,
    /// Start by immersion instead of the start button
    #[arg(long)]
    immersion: bool,
    /// Report the immersion sensor as unavailable
    #[arg(long)]
    no_sensor: bool,
    /// Replay a JSON-lines input script instead of the flags above
    #[arg(long, conflicts_with_all = ["goal", "ticks", "pause_after", "immersion"])]
    script: Option<PathBuf>,
    /// Print every event as a JSON line before the final snapshot
    #[arg(long)]
    events: bool,
}

/// A crown can't be turned past the end of its range.
fn dial(value: f64, range: &RotaryRange) -> f64 {
    if value.is_finite() {
        value.clamp(range.min_secs as f64, range.max_secs as f64)
    } else {
        value
    }
}

/// Inputs up to and including the optional pause/adjust/resume.
fn opening_inputs(
    args: &SimulateArgs,
    mode: SessionMode,
    goal: GoalDuration,
    range: &RotaryRange,
) -> Vec<Input> {
    let mut inputs = vec![
        Input::SelectMode { mode },
        Input::SetGoal {
            minutes: goal.minutes,
            seconds: goal.seconds,
        },
        if args.immersion {
            Input::ImmersionDetected
        } else {
            Input::Start
        },
    ];
    if let Some(after) = args.pause_after {
        inputs.extend(std::iter::repeat(Input::Tick).take(after as usize));
        inputs.push(Input::Pause);
        if let Some(value) = args.adjust {
            inputs.push(Input::Adjust {
                value: dial(value, range),
            });
        }
        inputs.push(Input::Resume);
    }
    inputs
}

pub fn run(args: SimulateArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut controller = build_controller(config, !args.no_sensor);

    let events = if let Some(path) = &args.script {
        let inputs = load_input_script(path)?;
        replay(&mut controller, inputs)
    } else {
        let goal = match args.goal {
            Some(secs) => GoalDuration::new(secs / 60, secs % 60)?,
            None => config.default_goal(),
        };
        let mode = args.mode.unwrap_or(config.timer.default_mode);
        let mut events = replay(
            &mut controller,
            opening_inputs(&args, mode, goal, &config.rotary_range()),
        );

        match args.ticks {
            Some(n) => {
                let already = args.pause_after.unwrap_or(0);
                let rest = n.saturating_sub(already);
                events.extend(replay(
                    &mut controller,
                    std::iter::repeat(Input::Tick).take(rest as usize),
                ));
            }
            None => {
                while controller.is_running() {
                    events.extend(controller.handle(Input::Tick));
                }
            }
        }
        events
    };

    if args.events {
        for event in &events {
            print_event_line(event)?;
        }
    }
    let snapshot = controller.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dial_stays_inside_rotary_range() {
        let range = RotaryRange::default();
        assert_eq!(dial(80.0, &range), 80.0);
        assert_eq!(dial(1e18, &range), 600.0);
        assert_eq!(dial(-30.0, &range), 0.0);
        assert!(dial(f64::NAN, &range).is_nan());
    }
}
