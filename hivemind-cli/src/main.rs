//! HIVEMIND CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game with a chosen policy
//! - selfplay: Play many independent games and report statistics
//! - perft: Count action sequences to a fixed depth

mod perft;
mod play;
mod selfplay;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hivemind")]
#[command(about = "HIVEMIND hex tile-stacking rules engine")]
struct Cli {
    /// Random seed for reproducible games
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play::PlayArgs),
    /// Play many games and report results
    Selfplay(selfplay::SelfplayArgs),
    /// Count legal action sequences to a depth
    Perft(perft::PerftArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Selfplay(args) => selfplay::run(args, cli.seed),
        Commands::Perft(args) => perft::run(args),
    }
}
