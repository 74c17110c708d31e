//! Events fed into a session and the effects a transition asks the host to carry out.
//!
//! Events are domain inputs, not side effects. Effects are the only way the
//! pure transition talks to timers and collaborators.

use serde::{Deserialize, Serialize};

use super::{CellIndex, DroppedClick, PlaybackRequest, Verdict};

/// Input to a [`GameSession`](super::GameSession) transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Start a new game (also used for restart).
    Start,
    /// The player clicked a cell.
    Click(CellIndex),
    /// Playback lit a cell (`Some`) or cleared it (`None`).
    PlaybackStep {
        /// Generation the playback was issued for.
        generation: u64,
        /// Cell now lit, if any.
        active: Option<CellIndex>,
    },
    /// Playback ran to completion.
    PlaybackFinished {
        /// Generation the playback was issued for.
        generation: u64,
    },
}

/// Something the host must do, or be told, after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run a playback of the sequence.
    Playback(PlaybackRequest),
    /// A click was validated.
    Judged(Verdict),
    /// A click was ignored.
    Dropped(DroppedClick),
    /// A playback event from an older generation was ignored.
    Stale {
        /// Generation carried by the ignored event.
        generation: u64,
    },
    /// An event that has no meaning in the current phase was ignored.
    Ignored,
    /// The game just ended; the score is final and may be submitted.
    GameOver {
        /// Final score.
        score: u32,
    },
}
