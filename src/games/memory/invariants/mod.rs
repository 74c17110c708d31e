//! First-class invariants for the memory game.
//!
//! Invariants are logical properties that must hold for every reachable
//! session. [`GameSession::apply`](super::GameSession::apply) checks them in
//! debug builds after each transition, and each one is testable on its own.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of two and three invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

type Check<S> = (fn(&S) -> bool, fn() -> &'static str);

fn collect<S>(checks: &[Check<S>], state: &S) -> Result<(), Vec<InvariantViolation>> {
    let violations: Vec<_> = checks
        .iter()
        .filter(|(holds, _)| !holds(state))
        .map(|(_, description)| InvariantViolation::new(description()))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [Check<S>; 2] = [
            (I1::holds, I1::description),
            (I2::holds, I2::description),
        ];
        collect(&checks, state)
    }
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let checks: [Check<S>; 3] = [
            (I1::holds, I1::description),
            (I2::holds, I2::description),
            (I3::holds, I3::description),
        ];
        collect(&checks, state)
    }
}

pub mod active_cell;
pub mod prefix_consistent;
pub mod sequence_length;

pub use active_cell::ActiveCellInvariant;
pub use prefix_consistent::PrefixConsistentInvariant;
pub use sequence_length::SequenceLengthInvariant;

/// All session invariants as a composable set.
pub type MemoryInvariants = (
    SequenceLengthInvariant,
    PrefixConsistentInvariant,
    ActiveCellInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::memory::{Event, GameSession, Phase};
    use std::time::Duration;

    fn started() -> GameSession {
        GameSession::new(16, Duration::ZERO)
            .apply(Event::Start, || 2)
            .session
    }

    #[test]
    fn test_invariant_set_holds_for_idle_session() {
        let session = GameSession::new(16, Duration::ZERO);
        assert!(MemoryInvariants::check_all(&session).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_start() {
        assert!(MemoryInvariants::check_all(&started()).is_ok());
    }

    #[test]
    fn test_invariant_set_reports_every_violation() {
        let mut session = started();
        session.phase = Phase::AwaitingInput;
        session.score = 4;
        session.active_cell = Some(2);

        let violations = MemoryInvariants::check_all(&session).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (SequenceLengthInvariant, ActiveCellInvariant);
        assert!(TwoInvariants::check_all(&started()).is_ok());
    }
}
