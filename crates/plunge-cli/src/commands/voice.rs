use clap::Args;
use plunge_core::{Config, Input, ShortcutDonation, VoiceCommand};

use super::{build_controller, print_event_line};

#[derive(Args)]
pub struct VoiceArgs {
    /// Duration carried by the voice command, in seconds
    #[arg(long)]
    duration: u64,
    /// Print the shortcut donation for this duration instead of starting
    #[arg(long)]
    donation: bool,
}

pub fn run(args: VoiceArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if args.donation {
        let donation = ShortcutDonation::quick_start(args.duration, config.timer.default_mode);
        println!("{}", serde_json::to_string_pretty(&donation)?);
        return Ok(());
    }

    let mut controller = build_controller(config, false);
    let command = VoiceCommand {
        duration_secs: args.duration,
    };
    let events = controller.handle(Input::from(command));
    if events.is_empty() {
        return Err("voice command ignored: duration must be positive".into());
    }
    for event in &events {
        print_event_line(event)?;
    }
    println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
    Ok(())
}
