//! Color Rush library - a repeat-the-sequence memory game
//!
//! The board lights up a growing sequence of cells; the player repeats it
//! cell by cell, and one wrong click ends the game.
//!
//! # Architecture
//!
//! - **Games**: the memory game state machine, timed playback and validation
//! - **Leaderboard**: score persistence behind the [`ScoreStore`] seam
//! - **Config**: TOML game settings
//! - **Demo**: headless self-play on real timers
//!
//! # Example
//!
//! ```no_run
//! use color_rush::{GameRuntime, GameStateMachine, PlaybackScheduler, RngSource, ROUND_DELAY};
//!
//! # async fn example() {
//! let machine = GameStateMachine::new(16, RngSource::seeded(7), ROUND_DELAY);
//! let mut runtime = GameRuntime::new(machine, PlaybackScheduler::default());
//!
//! runtime.start();
//! runtime.wait_for_input().await;
//! let first = runtime.machine().session().sequence()[0];
//! runtime.click(first);
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod demo;
mod games;
mod leaderboard;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig};

// Crate-level exports - Demo
pub use demo::{DemoOptions, DemoRound, DemoTranscript, run_demo};

// Crate-level exports - Memory game
pub use games::memory::{
    Board, BoardView, Cell, CellIndex, CellView, ColorTag, DroppedClick, Effect, Effects, Event,
    GAP, GameRuntime, GameSession, GameStateMachine, HOLD, InputValidator, LEAD_IN, Phase,
    PlaybackCue, PlaybackRequest, PlaybackScheduler, PlaybackStep, PlaybackTiming, ROUND_DELAY,
    RandomSequenceGenerator, RngSource, ScriptedSource, Transition, UniformSource, Verdict,
};

// Crate-level exports - Session invariants
pub use games::memory::invariants;

// Crate-level exports - Leaderboard
pub use leaderboard::{
    LeaderboardError, LeaderboardService, LeaderboardState, MAX_NAME_LEN, MemoryScoreStore,
    NewScore, PlayerName, RETRY_MESSAGE, ScoreEntry, ScoreRepository, ScoreStore, SubmitStatus,
};
