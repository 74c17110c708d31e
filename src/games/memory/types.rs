//! Core domain types for the memory game.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::instrument;

use super::random::UniformSource;

/// Position of a cell on the board, in `[0, N)`.
pub type CellIndex = usize;

/// Color tag painted on a cell when the board is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ColorTag {
    /// Red cell.
    Red,
    /// Blue cell.
    Blue,
    /// Green cell.
    Green,
    /// Yellow cell.
    Yellow,
}

impl ColorTag {
    /// Every color tag, in declaration order.
    pub const ALL: [ColorTag; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    /// Draws a color uniformly from the color set.
    pub fn draw(source: &mut impl UniformSource) -> Self {
        Self::ALL[source.next_below(Self::ALL.len())]
    }
}

/// One addressable position on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    index: CellIndex,
    color: ColorTag,
}

impl Cell {
    /// Returns the cell's index.
    pub fn index(&self) -> CellIndex {
        self.index
    }

    /// Returns the cell's color tag.
    pub fn color(&self) -> ColorTag {
        self.color
    }
}

/// Fixed-size set of colored cells.
///
/// Colors are drawn once, when the board is generated, and never change.
/// Restarting a game keeps the same board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Generates a board of `size` cells with independently drawn colors.
    #[instrument(skip(source))]
    pub fn generate(size: usize, source: &mut impl UniformSource) -> Self {
        let cells = (0..size)
            .map(|index| Cell {
                index,
                color: ColorTag::draw(source),
            })
            .collect();
        Self { cells }
    }

    /// Builds a board from explicit colors, one per cell.
    pub fn from_colors(colors: impl IntoIterator<Item = ColorTag>) -> Self {
        let cells = colors
            .into_iter()
            .enumerate()
            .map(|(index, color)| Cell { index, color })
            .collect();
        Self { cells }
    }

    /// Number of cells on the board.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if the board has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns true if `index` addresses a cell on this board.
    pub fn contains(&self, index: CellIndex) -> bool {
        index < self.cells.len()
    }

    /// Gets the cell at `index`.
    pub fn get(&self, index: CellIndex) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Gets the color at `index`.
    pub fn color_at(&self, index: CellIndex) -> Option<ColorTag> {
        self.get(index).map(Cell::color)
    }

    /// Returns all cells in index order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Phase of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Phase {
    /// No game has been started yet.
    #[default]
    Idle,
    /// The sequence is being played back; clicks are dropped.
    Playing,
    /// The player is reproducing the sequence.
    AwaitingInput,
    /// The player clicked a wrong cell.
    GameOver,
}

impl Phase {
    /// Returns true if clicks are validated in this phase.
    pub fn accepts_clicks(self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    /// Returns true if a new game may be started from this phase.
    pub fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::GameOver)
    }

    /// Returns true if a round is in progress.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::AwaitingInput)
    }

    /// Label shown to the player.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "PRESS START",
            Self::Playing => "WATCH",
            Self::AwaitingInput => "YOUR TURN",
            Self::GameOver => "GAME OVER",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::memory::random::ScriptedSource;

    #[test]
    fn test_generate_assigns_indices_in_order() {
        let mut source = ScriptedSource::new(vec![0, 1, 2, 3]);
        let board = Board::generate(6, &mut source);

        assert_eq!(board.len(), 6);
        for (i, cell) in board.cells().iter().enumerate() {
            assert_eq!(cell.index(), i);
        }
        assert_eq!(board.color_at(0), Some(ColorTag::Red));
        assert_eq!(board.color_at(3), Some(ColorTag::Yellow));
        assert_eq!(board.color_at(4), Some(ColorTag::Red));
        assert_eq!(board.color_at(6), None);
    }

    #[test]
    fn test_only_awaiting_input_accepts_clicks() {
        assert!(!Phase::Idle.accepts_clicks());
        assert!(!Phase::Playing.accepts_clicks());
        assert!(Phase::AwaitingInput.accepts_clicks());
        assert!(!Phase::GameOver.accepts_clicks());
    }

    #[test]
    fn test_color_display_is_lowercase() {
        assert_eq!(ColorTag::Green.to_string(), "green");
        assert_eq!(ColorTag::Yellow.to_string(), "yellow");
    }
}
