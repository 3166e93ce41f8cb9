use clap::{Parser, Subcommand};
use plunge_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "plunge-cli", version, about = "Plunge Timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive session in real time
    Run(commands::run::RunArgs),
    /// Run a session instantly, without waiting for the clock
    Simulate(commands::simulate::SimulateArgs),
    /// Start a session the way a voice shortcut would
    Voice(commands::voice::VoiceArgs),
    /// Print the glanceable summary and its timeline
    Glance,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr; stdout carries JSON only.
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_tracing(&config.logging.level);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, &config).await,
        Commands::Simulate(args) => commands::simulate::run(args, &config),
        Commands::Voice(args) => commands::voice::run(args, &config),
        Commands::Glance => commands::glance::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
