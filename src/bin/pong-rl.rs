//! pong-rl CLI - Self-play Q-learning trainer for a two-paddle ball game
//!
//! This CLI provides a unified interface for:
//! - Training both paddles against each other
//! - Inspecting stored Q-tables
//! - Exporting Q-tables for further analysis

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pong-rl")]
#[command(version, about = "Self-play Q-learning trainer for a two-paddle ball game", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train both agents by self-play
    Train(pong_rl::cli::commands::train::TrainArgs),

    /// Summarize a stored Q-table
    Inspect(pong_rl::cli::commands::inspect::InspectArgs),

    /// Export a Q-table as CSV
    Export(pong_rl::cli::commands::export::ExportArgs),
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => pong_rl::cli::commands::train::execute(args),
        Commands::Inspect(args) => pong_rl::cli::commands::inspect::execute(args),
        Commands::Export(args) => pong_rl::cli::commands::export::execute(args),
    }
}
