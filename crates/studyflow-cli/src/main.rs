use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "studyflow", version, about = "Studyflow CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Task queue management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Study plan generation
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Work and break durations
    Durations {
        #[command(subcommand)]
        action: commands::durations::DurationsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Focus statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
}

/// Logs go to stderr; stdout is reserved for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("STUDYFLOW_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Durations { action } => commands::durations::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Stats { action } => commands::stats::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
