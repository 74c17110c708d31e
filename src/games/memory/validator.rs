//! Input validation: each click is compared against the expected position.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{CellIndex, Phase};

/// Result of validating one click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Click matched; more clicks are needed to finish the round.
    Continue,
    /// Click matched and completed the sequence.
    RoundComplete,
    /// Click did not match the expected cell.
    Mismatch,
}

/// A click that was ignored without touching the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DroppedClick {
    /// Clicks are not accepted in this phase.
    #[display("Clicks are not accepted while {}", _0)]
    NotAccepting(Phase),

    /// The clicked index is not on the board.
    #[display("Cell {} is outside a board of {} cells", index, size)]
    OutOfBounds {
        /// The clicked index.
        index: CellIndex,
        /// Number of cells on the board.
        size: usize,
    },
}

impl std::error::Error for DroppedClick {}

/// Compares player clicks against the current sequence.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputValidator;

impl InputValidator {
    /// Records `click` and judges it against `sequence`.
    ///
    /// The click is appended to `player_input` before comparison, so the
    /// position just appended is always the one checked.
    #[instrument(skip(sequence, player_input), fields(expected_len = sequence.len(), input_len = player_input.len()))]
    pub fn submit(
        sequence: &[CellIndex],
        player_input: &mut Vec<CellIndex>,
        click: CellIndex,
    ) -> Verdict {
        player_input.push(click);
        let k = player_input.len() - 1;

        let verdict = if sequence.get(k) != Some(&click) {
            Verdict::Mismatch
        } else if player_input.len() == sequence.len() {
            Verdict::RoundComplete
        } else {
            Verdict::Continue
        };

        debug!(position = k, click, ?verdict, "Click judged");
        verdict
    }
}
