//! Color Rush - Unified CLI
//!
//! Plays the game in the terminal, prints the leaderboard, or runs a
//! headless demo.

#![warn(missing_docs)]

mod cli;
mod tui;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use color_rush::{
    DemoOptions, GameConfig, GameRuntime, GameStateMachine, LeaderboardService, LeaderboardState,
    MemoryScoreStore, PlaybackScheduler, RngSource, ScoreRepository, run_demo,
};
use std::path::Path;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            db,
            seed,
            no_persist,
            log_file,
        } => run_play(&config, db, seed, no_persist, &log_file).await,
        Command::Leaderboard { config, db, top } => run_leaderboard(&config, db, top),
        Command::Demo {
            config,
            seed,
            rounds,
            time_scale,
            json,
        } => run_demo_command(&config, seed, rounds, time_scale, json).await,
    }
}

/// Logs to stderr for the commands that don't own the terminal.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config and applies command-line overrides.
#[instrument(skip(path), fields(path = %path.display()))]
fn load_config(path: &Path, db: Option<String>, seed: Option<u64>) -> Result<GameConfig> {
    let mut config = GameConfig::load_or_default(path)?;
    if let Some(db) = db {
        info!(db = %db, "Overriding database path");
        config = config.with_db_path(db);
    }
    if seed.is_some() {
        config = config.with_seed(seed);
    }
    config.validate()?;
    Ok(config)
}

/// Opens the score store, falling back to memory if the database is unusable.
#[instrument(skip(config))]
fn open_leaderboard(config: &GameConfig, no_persist: bool) -> LeaderboardService {
    if no_persist {
        info!("Scores kept in memory only");
        return LeaderboardService::new(MemoryScoreStore::new());
    }

    match ScoreRepository::open(config.db_path().clone()) {
        Ok(repository) => LeaderboardService::new(repository),
        Err(e) => {
            warn!(error = %e, "Score database unavailable, keeping scores in memory");
            LeaderboardService::new(MemoryScoreStore::new())
        }
    }
}

/// Run the terminal game
async fn run_play(
    config_path: &Path,
    db: Option<String>,
    seed: Option<u64>,
    no_persist: bool,
    log_file: &str,
) -> Result<()> {
    let config = load_config(config_path, db, seed)?;
    let leaderboard = open_leaderboard(&config, no_persist);

    let source = match config.seed() {
        Some(seed) => RngSource::seeded(*seed),
        None => RngSource::from_entropy(),
    };
    let timing = config.timing();
    let machine = GameStateMachine::new(*config.board_size(), source, timing.round_delay);
    let runtime = GameRuntime::new(machine, PlaybackScheduler::new(timing));

    tui::run_tui(
        runtime,
        leaderboard,
        *config.leaderboard_size(),
        *config.columns(),
        log_file,
    )
    .await
}

/// Print the leaderboard
fn run_leaderboard(config_path: &Path, db: Option<String>, top: Option<usize>) -> Result<()> {
    initialize_tracing();
    let config = load_config(config_path, db, None)?;
    let k = top.unwrap_or(*config.leaderboard_size());

    let repository = ScoreRepository::open(config.db_path().clone())?;
    match LeaderboardService::new(repository).top(k) {
        LeaderboardState::Loaded(entries) => {
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:>2}. {:<20} {:>4}  {}",
                    rank + 1,
                    entry.name(),
                    entry.score(),
                    entry.created_at().format("%Y-%m-%d %H:%M")
                );
            }
        }
        LeaderboardState::Empty | LeaderboardState::Loading => println!("No scores yet."),
        LeaderboardState::Unavailable { message } => {
            anyhow::bail!("Leaderboard unavailable: {}", message)
        }
    }
    Ok(())
}

/// Run the headless demo
async fn run_demo_command(
    config_path: &Path,
    seed: u64,
    rounds: u32,
    time_scale: f64,
    json: bool,
) -> Result<()> {
    initialize_tracing();
    if !time_scale.is_finite() || time_scale < 0.0 {
        anyhow::bail!("time scale must be a non-negative number, got {}", time_scale);
    }

    let config = load_config(config_path, None, Some(seed))?;
    let options = DemoOptions {
        seed,
        rounds,
        board_size: *config.board_size(),
        timing: config.timing().scaled(time_scale),
    };

    let transcript = run_demo(options).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&transcript)?);
    } else {
        println!("{}", transcript);
    }
    Ok(())
}
