//! Game session value object and its transition function.
//!
//! [`GameSession::apply`] is the whole game: it consumes a session and an
//! [`Event`] and returns the next session plus the [`Effects`] the host must
//! carry out. It never sleeps and never touches a random source directly;
//! a new cell is requested through the `draw` closure only when a transition
//! actually extends the sequence.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::invariants::{InvariantSet, MemoryInvariants};
use super::{
    CellIndex, DroppedClick, Effect, Event, InputValidator, Phase, PlaybackRequest, Verdict,
};

/// Mutable state of one game on a mounted board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub(crate) score: u32,
    pub(crate) phase: Phase,
    pub(crate) sequence: Vec<CellIndex>,
    pub(crate) player_input: Vec<CellIndex>,
    pub(crate) active_cell: Option<CellIndex>,
    pub(crate) generation: u64,
    board_size: usize,
    round_delay: Duration,
}

impl GameSession {
    /// Creates an idle session for a board of `board_size` cells.
    ///
    /// `round_delay` is the pause between a completed round and the next
    /// playback.
    #[instrument]
    pub fn new(board_size: usize, round_delay: Duration) -> Self {
        Self {
            score: 0,
            phase: Phase::Idle,
            sequence: Vec::new(),
            player_input: Vec::new(),
            active_cell: None,
            generation: 0,
            board_size,
            round_delay,
        }
    }

    /// Rounds completed in the current game.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Sequence the player must reproduce.
    pub fn sequence(&self) -> &[CellIndex] {
        &self.sequence
    }

    /// Clicks recorded in the current input window.
    pub fn player_input(&self) -> &[CellIndex] {
        &self.player_input
    }

    /// Cell lit by playback right now, if any.
    pub fn active_cell(&self) -> Option<CellIndex> {
        self.active_cell
    }

    /// Generation of the current game; bumped by every start.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of cells on the board this session plays on.
    pub fn board_size(&self) -> usize {
        self.board_size
    }

    /// Returns true if clicks are currently validated.
    pub fn accepts_clicks(&self) -> bool {
        self.phase.accepts_clicks()
    }

    /// Applies `event`, returning the next session and its effects.
    ///
    /// `draw` is called at most once, and only when the sequence grows.
    #[instrument(skip(self, draw), fields(phase = %self.phase, generation = self.generation, score = self.score))]
    pub fn apply(self, event: Event, draw: impl FnOnce() -> CellIndex) -> Transition {
        let transition = match event {
            Event::Start => self.start(draw),
            Event::Click(index) => self.click(index, draw),
            Event::PlaybackStep { generation, active } => self.playback_step(generation, active),
            Event::PlaybackFinished { generation } => self.playback_finished(generation),
        };

        // Postconditions are only checked in debug builds
        if cfg!(debug_assertions)
            && let Err(violations) = MemoryInvariants::check_all(&transition.session)
        {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            panic!("Session invariants violated: {}", descriptions);
        }

        transition
    }

    fn start(mut self, draw: impl FnOnce() -> CellIndex) -> Transition {
        if !self.phase.can_start() {
            debug!("Start ignored while a round is in progress");
            return Transition::unchanged(self, Effect::Ignored);
        }

        let first = draw();
        self.generation += 1;
        self.score = 0;
        self.sequence = vec![first];
        self.player_input.clear();
        self.active_cell = None;
        self.phase = Phase::Playing;

        info!(generation = self.generation, first, "Game started");
        let request = self.playback_request(Duration::ZERO);
        Transition::new(self, vec![Effect::Playback(request)])
    }

    fn click(mut self, index: CellIndex, draw: impl FnOnce() -> CellIndex) -> Transition {
        if !self.phase.accepts_clicks() {
            debug!(index, "Click dropped");
            let dropped = DroppedClick::NotAccepting(self.phase);
            return Transition::unchanged(self, Effect::Dropped(dropped));
        }
        if index >= self.board_size {
            warn!(index, size = self.board_size, "Click outside the board dropped");
            let dropped = DroppedClick::OutOfBounds {
                index,
                size: self.board_size,
            };
            return Transition::unchanged(self, Effect::Dropped(dropped));
        }

        let verdict = InputValidator::submit(&self.sequence, &mut self.player_input, index);
        match verdict {
            Verdict::Continue => Transition::new(self, vec![Effect::Judged(verdict)]),
            Verdict::Mismatch => {
                self.phase = Phase::GameOver;
                info!(score = self.score, "Game over");
                let score = self.score;
                Transition::new(
                    self,
                    vec![Effect::Judged(verdict), Effect::GameOver { score }],
                )
            }
            Verdict::RoundComplete => {
                self.score += 1;
                let next = draw();
                self.sequence.push(next);
                self.player_input.clear();
                self.phase = Phase::Playing;

                info!(score = self.score, next, "Round complete");
                let request = self.playback_request(self.round_delay);
                Transition::new(
                    self,
                    vec![Effect::Judged(verdict), Effect::Playback(request)],
                )
            }
        }
    }

    fn playback_step(mut self, generation: u64, active: Option<CellIndex>) -> Transition {
        if generation != self.generation {
            debug!(stale = generation, "Stale playback step ignored");
            return Transition::unchanged(self, Effect::Stale { generation });
        }
        if self.phase != Phase::Playing {
            warn!(?active, "Playback step outside playback ignored");
            return Transition::unchanged(self, Effect::Ignored);
        }

        self.active_cell = active;
        Transition::new(self, Vec::new())
    }

    fn playback_finished(mut self, generation: u64) -> Transition {
        if generation != self.generation {
            debug!(stale = generation, "Stale playback completion ignored");
            return Transition::unchanged(self, Effect::Stale { generation });
        }
        if self.phase != Phase::Playing {
            warn!("Playback completion outside playback ignored");
            return Transition::unchanged(self, Effect::Ignored);
        }

        self.active_cell = None;
        self.player_input.clear();
        self.phase = Phase::AwaitingInput;
        debug!(len = self.sequence.len(), "Input window open");
        Transition::new(self, Vec::new())
    }

    fn playback_request(&self, pre_delay: Duration) -> PlaybackRequest {
        PlaybackRequest {
            generation: self.generation,
            sequence: self.sequence.clone(),
            pre_delay,
        }
    }
}

/// Effects produced by one transition, in the order they occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effects(Vec<Effect>);

impl Effects {
    /// Wraps a list of effects.
    pub fn new(effects: Vec<Effect>) -> Self {
        Self(effects)
    }

    /// Verdict of a validated click, if the transition judged one.
    pub fn verdict(&self) -> Option<Verdict> {
        self.0.iter().find_map(|effect| match effect {
            Effect::Judged(verdict) => Some(*verdict),
            _ => None,
        })
    }

    /// Reason a click was dropped, if it was.
    pub fn dropped(&self) -> Option<DroppedClick> {
        self.0.iter().find_map(|effect| match effect {
            Effect::Dropped(dropped) => Some(*dropped),
            _ => None,
        })
    }

    /// Playback requested by the transition, if any.
    pub fn playback(&self) -> Option<&PlaybackRequest> {
        self.0.iter().find_map(|effect| match effect {
            Effect::Playback(request) => Some(request),
            _ => None,
        })
    }

    /// Final score, if the transition ended the game.
    pub fn game_over(&self) -> Option<u32> {
        self.0.iter().find_map(|effect| match effect {
            Effect::GameOver { score } => Some(*score),
            _ => None,
        })
    }

    /// Returns true if the event was ignored as stale.
    pub fn is_stale(&self) -> bool {
        self.0.iter().any(|effect| matches!(effect, Effect::Stale { .. }))
    }

    /// Effects as a slice.
    pub fn as_slice(&self) -> &[Effect] {
        &self.0
    }

    /// Returns true if there are no effects.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Effects {
    type Item = Effect;
    type IntoIter = std::vec::IntoIter<Effect>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Next session and the effects that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Session after the event.
    pub session: GameSession,
    /// What the host must do next.
    pub effects: Effects,
}

impl Transition {
    fn new(session: GameSession, effects: Vec<Effect>) -> Self {
        Self {
            session,
            effects: Effects::new(effects),
        }
    }

    fn unchanged(session: GameSession, effect: Effect) -> Self {
        Self::new(session, vec![effect])
    }
}
