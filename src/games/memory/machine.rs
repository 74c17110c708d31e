//! Game state machine: board, generator and session behind one owner.

use std::time::Duration;

use tracing::{debug, info, instrument};

use super::{
    Board, BoardView, CellIndex, DroppedClick, Effects, Event, GameSession, RandomSequenceGenerator,
    UniformSource, Verdict,
};

/// Owns the one mutable [`GameSession`] of a mounted board.
///
/// The board is generated once, in [`GameStateMachine::new`], and survives
/// every restart. All randomness comes from the single source passed in.
#[derive(Debug, Clone)]
pub struct GameStateMachine<S> {
    board: Board,
    generator: RandomSequenceGenerator<S>,
    session: GameSession,
}

impl<S: UniformSource> GameStateMachine<S> {
    /// Generates a board of `board_size` cells and an idle session.
    #[instrument(skip(source))]
    pub fn new(board_size: usize, mut source: S, round_delay: Duration) -> Self {
        let board = Board::generate(board_size, &mut source);
        info!(board_size, "Board generated");
        Self::with_board(board, source, round_delay)
    }

    /// Uses an existing board.
    pub fn with_board(board: Board, source: S, round_delay: Duration) -> Self {
        let size = board.len();
        Self {
            generator: RandomSequenceGenerator::new(source, size),
            session: GameSession::new(size, round_delay),
            board,
        }
    }

    /// The board, unchanged since construction.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The current session.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Snapshot for the rendering side.
    pub fn view(&self) -> BoardView {
        BoardView::new(&self.board, &self.session)
    }

    /// Feeds one event through the session transition.
    #[instrument(skip(self), fields(phase = %self.session.phase()))]
    pub fn handle(&mut self, event: Event) -> Effects {
        let session = std::mem::replace(
            &mut self.session,
            GameSession::new(self.board.len(), Duration::ZERO),
        );
        let generator = &mut self.generator;
        let transition = session.apply(event, || generator.next_cell());
        self.session = transition.session;
        debug!(effects = ?transition.effects, phase = %self.session.phase(), "Event handled");
        transition.effects
    }

    /// Starts a game from `Idle` or `GameOver`.
    pub fn start(&mut self) -> Effects {
        self.handle(Event::Start)
    }

    /// Starts over after a game ended. The board is kept.
    #[instrument(skip(self))]
    pub fn restart(&mut self) -> Effects {
        info!(previous_score = self.session.score(), "Restarting");
        self.handle(Event::Start)
    }

    /// Submits a player click.
    pub fn click(&mut self, index: CellIndex) -> Effects {
        self.handle(Event::Click(index))
    }

    /// Submits a click and reports only the verdict or drop reason.
    pub fn judge(&mut self, index: CellIndex) -> Result<Verdict, DroppedClick> {
        let effects = self.click(index);
        match (effects.verdict(), effects.dropped()) {
            (Some(verdict), _) => Ok(verdict),
            (None, Some(dropped)) => Err(dropped),
            (None, None) => Err(DroppedClick::NotAccepting(self.session.phase())),
        }
    }

    /// Forwards a playback cue.
    pub fn playback_step(&mut self, generation: u64, active: Option<CellIndex>) -> Effects {
        self.handle(Event::PlaybackStep { generation, active })
    }

    /// Forwards playback completion.
    pub fn playback_finished(&mut self, generation: u64) -> Effects {
        self.handle(Event::PlaybackFinished { generation })
    }
}
