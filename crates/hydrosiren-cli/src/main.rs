use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};

mod audio;
mod commands;

#[derive(Parser)]
#[command(name = "hydrosiren", version, about = "Hydration reminder with daily siren breaks")]
struct Cli {
    /// Configuration file (defaults to ~/.config/hydrosiren/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the foreground reminder loop
    Run {
        /// Emit events and snapshots as JSON lines instead of the live view
        #[arg(long)]
        json: bool,
        /// Do not start the cycle automatically
        #[arg(long)]
        paused: bool,
    },
    /// Show the siren schedule and its next occurrences
    Schedule,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions { shell: clap_complete::Shell },
}

fn main() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { json, paused } => commands::run::run(cli.config, json, paused),
        Commands::Schedule => commands::schedule::run(cli.config),
        Commands::Config { action } => commands::config::run(action, cli.config),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "hydrosiren",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
