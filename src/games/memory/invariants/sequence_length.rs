//! Sequence length invariant: the sequence is one longer than the score.

use super::super::GameSession;
use super::Invariant;

/// Invariant: `len(sequence) == score + 1` while a round is in progress.
///
/// Idle and finished sessions are not constrained.
pub struct SequenceLengthInvariant;

impl Invariant<GameSession> for SequenceLengthInvariant {
    fn holds(session: &GameSession) -> bool {
        if !session.phase().is_active() {
            return true;
        }
        session.sequence().len() == session.score() as usize + 1
    }

    fn description() -> &'static str {
        "Sequence length equals score + 1 during a round"
    }
}
