mod commands;
mod config;
mod feed;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sportsengine-sync")]
#[command(about = "Sync a calendar feed into a SportsEngine team calendar")]
struct Cli {
    /// Config file (defaults to ~/.config/sportsengine-sync/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a team event for every event in the calendar feed (default)
    Sync,
    /// List events already on the team calendar
    Events {
        /// List events from this date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// List events until this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// List the team's opponents
    Opponents,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = config::load_config(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Commands::Sync);

    // Login and API calls use blocking HTTP
    tokio::task::spawn_blocking(move || match command {
        Commands::Sync => commands::sync::run(&config),
        Commands::Events { from, to } => {
            commands::events::run(&config, from.as_deref(), to.as_deref())
        }
        Commands::Opponents => commands::opponents::run(&config),
    })
    .await
    .context("Task join error")?
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={level},sportsengine_core={level}",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
