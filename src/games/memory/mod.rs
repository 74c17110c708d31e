//! Repeat-the-sequence memory game.
//!
//! The board shows a growing sequence of lit cells; the player repeats it
//! by clicking cells in order, and one wrong click ends the game.

mod action;
pub mod invariants;
mod machine;
mod playback;
mod random;
mod runtime;
mod session;
mod types;
mod validator;
mod view;

pub use action::{Effect, Event};
pub use machine::GameStateMachine;
pub use playback::{
    GAP, HOLD, LEAD_IN, PlaybackCue, PlaybackRequest, PlaybackScheduler, PlaybackStep,
    PlaybackTiming, ROUND_DELAY,
};
pub use random::{RandomSequenceGenerator, RngSource, ScriptedSource, UniformSource};
pub use runtime::GameRuntime;
pub use session::{Effects, GameSession, Transition};
pub use types::{Board, Cell, CellIndex, ColorTag, Phase};
pub use validator::{DroppedClick, InputValidator, Verdict};
pub use view::{BoardView, CellView};
