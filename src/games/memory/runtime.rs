//! Async host that drives a [`GameStateMachine`] on tokio timers.
//!
//! The runtime is the only owner of the machine. Playback runs as a spawned
//! task that does nothing but sleep and send cues back over a channel; the
//! cues are applied on the runtime's side, one at a time, so the session is
//! never touched concurrently.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::{
    BoardView, CellIndex, Effects, Event, GameStateMachine, Phase, PlaybackScheduler,
    UniformSource,
};

/// Runs playbacks for a state machine and feeds their cues back into it.
#[derive(Debug)]
pub struct GameRuntime<S> {
    machine: GameStateMachine<S>,
    scheduler: PlaybackScheduler,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    playback: Option<JoinHandle<()>>,
}

impl<S: UniformSource> GameRuntime<S> {
    /// Wraps a machine. Must be used inside a tokio runtime.
    pub fn new(machine: GameStateMachine<S>, scheduler: PlaybackScheduler) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            machine,
            scheduler,
            tx,
            rx,
            playback: None,
        }
    }

    /// The driven machine.
    pub fn machine(&self) -> &GameStateMachine<S> {
        &self.machine
    }

    /// The scheduler used for playbacks.
    pub fn scheduler(&self) -> PlaybackScheduler {
        self.scheduler
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> BoardView {
        self.machine.view()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.machine.session().phase()
    }

    /// Starts a game.
    pub fn start(&mut self) -> Effects {
        let effects = self.machine.start();
        self.carry_out(&effects);
        effects
    }

    /// Restarts after a game ended.
    pub fn restart(&mut self) -> Effects {
        let effects = self.machine.restart();
        self.carry_out(&effects);
        effects
    }

    /// Submits a click.
    pub fn click(&mut self, index: CellIndex) -> Effects {
        let effects = self.machine.click(index);
        self.carry_out(&effects);
        effects
    }

    /// Waits for the next playback cue and applies it.
    pub async fn next_event(&mut self) -> Effects {
        match self.rx.recv().await {
            Some(event) => self.apply(event),
            None => Effects::default(),
        }
    }

    /// Applies every cue that is already waiting, without blocking.
    ///
    /// Returns the number of cues applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Applies cues until playback is over.
    ///
    /// Returns true if the input window is now open.
    #[instrument(skip(self))]
    pub async fn wait_for_input(&mut self) -> bool {
        while self.phase() == Phase::Playing {
            self.next_event().await;
        }
        self.phase() == Phase::AwaitingInput
    }

    fn apply(&mut self, event: Event) -> Effects {
        let effects = self.machine.handle(event);
        if effects.is_stale() {
            debug!(?event, "Dropped cue from an earlier game");
        }
        self.carry_out(&effects);
        effects
    }

    fn carry_out(&mut self, effects: &Effects) {
        let Some(request) = effects.playback() else {
            return;
        };

        if let Some(previous) = self.playback.take()
            && !previous.is_finished()
        {
            warn!("Aborting playback that is still running");
            previous.abort();
        }

        debug!(generation = request.generation, len = request.sequence.len(), "Spawning playback");
        let task = self.scheduler.play(request.clone(), self.tx.clone());
        self.playback = Some(tokio::spawn(task));
    }
}

impl<S> Drop for GameRuntime<S> {
    fn drop(&mut self) {
        if let Some(playback) = self.playback.take() {
            playback.abort();
        }
    }
}
