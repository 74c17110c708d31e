//! Prefix invariant: recorded clicks agree with the sequence.

use super::super::{GameSession, Phase};
use super::Invariant;

/// Invariant: every recorded click matches the sequence at its position.
///
/// The single exception is the last click of a finished game, which is the
/// mismatch that ended it. Input never outgrows the sequence.
pub struct PrefixConsistentInvariant;

impl Invariant<GameSession> for PrefixConsistentInvariant {
    fn holds(session: &GameSession) -> bool {
        let input = session.player_input();
        let sequence = session.sequence();

        if input.len() > sequence.len() {
            return false;
        }

        let checked = match session.phase() {
            Phase::GameOver => input.len().saturating_sub(1),
            _ => input.len(),
        };
        input[..checked] == sequence[..checked]
    }

    fn description() -> &'static str {
        "Player input is a prefix of the sequence"
    }
}
