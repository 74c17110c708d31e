//! Active cell invariant: only playback lights cells.

use super::super::{GameSession, Phase};
use super::Invariant;

/// Invariant: a cell is active only while the phase is `Playing`.
pub struct ActiveCellInvariant;

impl Invariant<GameSession> for ActiveCellInvariant {
    fn holds(session: &GameSession) -> bool {
        session.active_cell().is_none() || session.phase() == Phase::Playing
    }

    fn description() -> &'static str {
        "Active cell is set only during playback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_detects_lit_cell_while_idle() {
        let mut session = GameSession::new(16, Duration::ZERO);
        assert!(ActiveCellInvariant::holds(&session));
        session.active_cell = Some(0);
        assert!(!ActiveCellInvariant::holds(&session));
    }
}
