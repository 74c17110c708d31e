//! Headless self-play: a perfect-memory player driven through the runtime.
//!
//! Useful for watching the timing contract on real timers without a
//! terminal, and as an end-to-end exercise of the game loop.

use std::fmt;

use derive_getters::Getters;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

use crate::games::memory::{
    CellIndex, ColorTag, GameRuntime, GameStateMachine, PlaybackScheduler, PlaybackTiming,
    RngSource, Verdict,
};

/// Parameters for a demo run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DemoOptions {
    /// RNG seed; the same seed replays the same game.
    pub seed: u64,
    /// Rounds to clear before missing on purpose.
    pub rounds: u32,
    /// Number of cells on the board.
    pub board_size: usize,
    /// Playback timing.
    pub timing: PlaybackTiming,
}

/// One cleared round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct DemoRound {
    /// Score when the round began.
    round: u32,
    /// Sequence played back for the round.
    sequence: Vec<CellIndex>,
    /// Time from the request until input opened, in milliseconds.
    waited_ms: u64,
}

/// Everything that happened in a demo run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct DemoTranscript {
    /// Seed used.
    seed: u64,
    /// Board colors in index order.
    board: Vec<ColorTag>,
    /// Cleared rounds, in order.
    rounds: Vec<DemoRound>,
    /// Final score.
    final_score: u32,
    /// Whether the deliberate miss ended the game.
    game_over: bool,
}

impl fmt::Display for DemoTranscript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed {}", self.seed)?;
        let colors: Vec<String> = self.board.iter().map(ToString::to_string).collect();
        writeln!(f, "board [{}]", colors.join(", "))?;
        for round in &self.rounds {
            writeln!(
                f,
                "round {:>3}  waited {:>6} ms  sequence {:?}",
                round.round, round.waited_ms, round.sequence
            )?;
        }
        if self.game_over {
            write!(f, "game over, score {}", self.final_score)
        } else {
            write!(f, "stopped, score {}", self.final_score)
        }
    }
}

/// Plays `options.rounds` perfect rounds, then misses once.
///
/// A one-cell board cannot be missed, so the run just stops there.
/// Must be called inside a tokio runtime.
#[instrument(skip(options), fields(seed = options.seed, rounds = options.rounds))]
pub async fn run_demo(options: DemoOptions) -> DemoTranscript {
    let machine = GameStateMachine::new(
        options.board_size,
        RngSource::seeded(options.seed),
        options.timing.round_delay,
    );
    let board = machine.board().cells().iter().map(|cell| cell.color()).collect();
    let mut runtime = GameRuntime::new(machine, PlaybackScheduler::new(options.timing));

    info!("Demo started");
    let mut rounds = Vec::new();
    let mut requested = Instant::now();
    runtime.start();

    for _ in 0..options.rounds {
        if !runtime.wait_for_input().await {
            break;
        }
        let session = runtime.machine().session();
        let round = DemoRound {
            round: session.score(),
            sequence: session.sequence().to_vec(),
            waited_ms: u64::try_from(requested.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        debug!(round = round.round, len = round.sequence.len(), "Replaying sequence");

        requested = Instant::now();
        for &cell in &round.sequence {
            runtime.click(cell);
        }
        rounds.push(round);
    }

    let mut game_over = false;
    if options.board_size > 1 && runtime.wait_for_input().await {
        let expected = runtime
            .machine()
            .session()
            .sequence()
            .first()
            .copied()
            .unwrap_or_default();
        let wrong = (expected + 1) % options.board_size;
        let effects = runtime.click(wrong);
        game_over = effects.verdict() == Some(Verdict::Mismatch);
    }

    let final_score = runtime.machine().session().score();
    info!(final_score, game_over, "Demo finished");
    DemoTranscript {
        seed: options.seed,
        board,
        rounds,
        final_score,
        game_over,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn options(rounds: u32) -> DemoOptions {
        DemoOptions {
            seed: 7,
            rounds,
            board_size: 16,
            timing: PlaybackTiming::default(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_clears_rounds_then_misses() {
        let transcript = run_demo(options(3)).await;
        assert_eq!(transcript.rounds().len(), 3);
        assert_eq!(*transcript.final_score(), 3);
        assert!(*transcript.game_over());
        for (i, round) in transcript.rounds().iter().enumerate() {
            assert_eq!(round.sequence().len(), i + 1);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_demo_waits_follow_timing() {
        let transcript = run_demo(options(2)).await;
        let timing = PlaybackTiming::default();
        let first = timing.lead_in + timing.hold + timing.gap;
        let second = timing.round_delay + timing.lead_in + (timing.hold + timing.gap) * 2;
        assert_eq!(transcript.rounds()[0].waited_ms(), &(first.as_millis() as u64));
        assert_eq!(transcript.rounds()[1].waited_ms(), &(second.as_millis() as u64));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_seed_same_game() {
        let a = run_demo(options(4)).await;
        let b = run_demo(options(4)).await;
        assert_eq!(a, b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_cell_board_never_misses() {
        let transcript = run_demo(DemoOptions {
            board_size: 1,
            timing: PlaybackTiming {
                lead_in: Duration::ZERO,
                hold: Duration::from_millis(1),
                gap: Duration::ZERO,
                round_delay: Duration::ZERO,
            },
            ..options(2)
        })
        .await;
        assert!(!*transcript.game_over());
        assert_eq!(*transcript.final_score(), 2);
    }
}
