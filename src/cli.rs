//! Command-line interface for color_rush.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Color Rush - repeat the sequence of lit cells
#[derive(Parser, Debug)]
#[command(name = "color_rush")]
#[command(about = "Terminal memory game: watch the cells light up, then repeat them", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Path to the game config file (defaults are used if it doesn't exist)
        #[arg(short, long, default_value = "color_rush.toml")]
        config: PathBuf,

        /// Score database file, overrides the config
        #[arg(long)]
        db: Option<String>,

        /// Fixed RNG seed, overrides the config
        #[arg(long)]
        seed: Option<u64>,

        /// Keep scores in memory only
        #[arg(long)]
        no_persist: bool,

        /// File that receives logs while the terminal is in use
        #[arg(long, default_value = "color_rush.log")]
        log_file: String,
    },

    /// Print the top scores
    Leaderboard {
        /// Path to the game config file
        #[arg(short, long, default_value = "color_rush.toml")]
        config: PathBuf,

        /// Score database file, overrides the config
        #[arg(long)]
        db: Option<String>,

        /// Number of entries to show, overrides the config
        #[arg(long)]
        top: Option<usize>,
    },

    /// Watch a perfect-memory player on real timers, then print the transcript
    Demo {
        /// Path to the game config file
        #[arg(short, long, default_value = "color_rush.toml")]
        config: PathBuf,

        /// RNG seed
        #[arg(long, default_value = "1")]
        seed: u64,

        /// Rounds to clear before the deliberate miss
        #[arg(long, default_value = "5")]
        rounds: u32,

        /// Multiplier applied to every playback delay (0 runs instantly)
        #[arg(long, default_value = "1.0")]
        time_scale: f64,

        /// Print the transcript as JSON
        #[arg(long)]
        json: bool,
    },
}
