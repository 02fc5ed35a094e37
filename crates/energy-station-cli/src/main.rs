use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "energy-station", version, about = "Energy Station practice player CLI")]
struct Cli {
    /// Log engine activity to stderr (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse practice content
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
    /// Recommend practices from an energy self-assessment
    Recommend(commands::recommend::RecommendArgs),
    /// Run a session on a manual clock and print its events
    Simulate(commands::simulate::SimulateArgs),
    /// Play a session in real time, one JSON event per line
    Play(commands::play::PlayArgs),
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Catalog { action } => commands::catalog::run(action),
        Commands::Recommend(args) => commands::recommend::run(args),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Play(args) => commands::play::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
