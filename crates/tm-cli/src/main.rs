//! CLI frontend for the Tile Master roll and progression engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "tilemaster",
    about = "Tile Master: roll the die, match the tiles",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the campaign interactively
    Play {
        /// RNG seed for level generation and rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Number of levels before the campaign wraps
        #[arg(short, long, default_value = "10")]
        levels: u32,

        /// Minimum tiles per board
        #[arg(short, long, default_value = "12")]
        board_size: u32,

        /// Save file to resume from and write progress to
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print a generated level without playing it
    Level {
        /// Level number
        level: u32,

        /// RNG seed for level generation
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Minimum tiles per board
        #[arg(short, long, default_value = "12")]
        board_size: u32,

        /// Print the layout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Let a greedy autoplayer run the campaign and summarize it
    Simulate {
        /// Number of levels to play
        #[arg(short, long, default_value = "10")]
        levels: u32,

        /// RNG seed for level generation and rolls
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Attempts per level before giving up
        #[arg(short, long, default_value = "3")]
        attempts: u32,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            seed,
            levels,
            board_size,
            save,
        } => commands::play::run(seed, levels, board_size, save.as_deref()),
        Commands::Level {
            level,
            seed,
            board_size,
            json,
        } => commands::level::run(level, seed, board_size, json),
        Commands::Simulate {
            levels,
            seed,
            attempts,
        } => commands::simulate::run(levels, seed, attempts),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
