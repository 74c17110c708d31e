//! Read-only snapshot handed to whatever draws the board.

use serde::{Deserialize, Serialize};

use super::{Board, CellIndex, ColorTag, GameSession, Phase};

/// One cell as the renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    /// Cell position.
    pub index: CellIndex,
    /// Color tag assigned at board generation.
    pub color: ColorTag,
    /// Whether playback has this cell lit.
    pub active: bool,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardView {
    /// Cells in index order.
    pub cells: Vec<CellView>,
    /// Current phase.
    pub phase: Phase,
    /// Label for the phase.
    pub label: &'static str,
    /// Current score.
    pub score: u32,
    /// Whether clicks are accepted right now.
    pub accepts_clicks: bool,
    /// Length of the current sequence.
    pub sequence_len: usize,
    /// Clicks entered so far in this input window.
    pub input_len: usize,
}

impl BoardView {
    /// Builds the snapshot from a board and its session.
    pub fn new(board: &Board, session: &GameSession) -> Self {
        let active = session.active_cell();
        let cells = board
            .cells()
            .iter()
            .map(|cell| CellView {
                index: cell.index(),
                color: cell.color(),
                active: active == Some(cell.index()),
            })
            .collect();

        Self {
            cells,
            phase: session.phase(),
            label: session.phase().label(),
            score: session.score(),
            accepts_clicks: session.accepts_clicks(),
            sequence_len: session.sequence().len(),
            input_len: session.player_input().len(),
        }
    }

    /// Index of the lit cell, if any.
    pub fn active_cell(&self) -> Option<CellIndex> {
        self.cells.iter().find(|cell| cell.active).map(|cell| cell.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::memory::Event;
    use std::time::Duration;

    #[test]
    fn test_view_marks_only_the_active_cell() {
        let board = Board::from_colors(ColorTag::ALL);
        let session = GameSession::new(board.len(), Duration::ZERO)
            .apply(Event::Start, || 2)
            .session
            .apply(
                Event::PlaybackStep {
                    generation: 1,
                    active: Some(2),
                },
                || unreachable!(),
            )
            .session;

        let view = BoardView::new(&board, &session);
        assert_eq!(view.active_cell(), Some(2));
        assert_eq!(view.cells.iter().filter(|c| c.active).count(), 1);
        assert_eq!(view.label, "WATCH");
        assert!(!view.accepts_clicks);
    }
}
