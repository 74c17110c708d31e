//! Application state and key handling.

use color_rush::{
    BoardView, CellIndex, DroppedClick, Effects, GameRuntime, LeaderboardService,
    LeaderboardState, MAX_NAME_LEN, Phase, SubmitStatus, UniformSource, Verdict,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, info, instrument, warn};

use super::input;

/// Score submission form shown once a game is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameForm {
    /// The player is typing a name.
    Editing {
        /// Name typed so far.
        name: String,
        /// Last submission problem, shown under the field.
        error: Option<String>,
    },
    /// The score was stored under `name`.
    Submitted {
        /// Name the score was stored under.
        name: String,
    },
}

/// Main application state.
pub struct App<S> {
    runtime: GameRuntime<S>,
    leaderboard: LeaderboardService,
    standings: LeaderboardState,
    pending_standings: Option<oneshot::Receiver<LeaderboardState>>,
    leaderboard_size: usize,
    columns: usize,
    cursor: CellIndex,
    form: Option<NameForm>,
    status: String,
    should_quit: bool,
}

impl<S: UniformSource> App<S> {
    /// Creates the app and starts loading the leaderboard in the background.
    ///
    /// Must be called inside a tokio runtime.
    #[instrument(skip(runtime, leaderboard))]
    pub fn new(
        runtime: GameRuntime<S>,
        leaderboard: LeaderboardService,
        leaderboard_size: usize,
        columns: usize,
    ) -> Self {
        let mut app = Self {
            runtime,
            leaderboard,
            standings: LeaderboardState::Loading,
            pending_standings: None,
            leaderboard_size,
            columns,
            cursor: 0,
            form: None,
            status: "Press S to start.".to_string(),
            should_quit: false,
        };
        app.fetch_standings();
        app
    }

    /// The game runtime.
    pub fn runtime(&self) -> &GameRuntime<S> {
        &self.runtime
    }

    /// The game runtime, mutably.
    pub fn runtime_mut(&mut self) -> &mut GameRuntime<S> {
        &mut self.runtime
    }

    /// Snapshot of the board for rendering.
    pub fn view(&self) -> BoardView {
        self.runtime.view()
    }

    /// Leaderboard as last loaded, or `Loading` while a fetch runs.
    pub fn standings(&self) -> &LeaderboardState {
        &self.standings
    }

    /// Grid width.
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Cell under the keyboard cursor.
    pub fn cursor(&self) -> CellIndex {
        self.cursor
    }

    /// Score form, present after a game ends.
    pub fn form(&self) -> Option<&NameForm> {
        self.form.as_ref()
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Whether the player asked to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Applies playback cues and any finished leaderboard fetch that have
    /// arrived since the last frame. Returns the number of cues applied.
    pub fn tick(&mut self) -> usize {
        self.poll_standings();
        let applied = self.runtime.pump();
        if applied > 0 && self.runtime.phase() == Phase::AwaitingInput {
            self.status = "Your turn: repeat the sequence.".to_string();
        }
        applied
    }

    /// Handles one key press.
    #[instrument(skip(self), fields(code = ?key.code))]
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl_c =
            key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        if key.code == KeyCode::Esc || ctrl_c {
            info!("User quit");
            self.should_quit = true;
            return;
        }

        if key.code == KeyCode::F(2) {
            self.start();
            return;
        }

        if self.editing_name() {
            self.edit_name(key.code);
            return;
        }

        let size = self.view().cells.len();
        match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.click(self.cursor),
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.cursor = input::move_cursor(self.cursor, key.code, self.columns, size);
            }
            KeyCode::Char(c) => {
                let lower = c.to_ascii_lowercase();
                if self.runtime.phase().can_start() && (lower == 's' || lower == 'r') {
                    self.start();
                } else if let Some(index) = input::direct_index(c)
                    && index < size
                {
                    self.cursor = index;
                    self.click(index);
                }
            }
            _ => {}
        }
    }

    /// Reads the leaderboard on a blocking task; [`Self::tick`] picks up the
    /// result. A fetch already in flight is superseded.
    fn fetch_standings(&mut self) {
        let service = self.leaderboard.clone();
        let k = self.leaderboard_size;
        let (tx, rx) = oneshot::channel();
        tokio::task::spawn_blocking(move || {
            // The app may have quit or refetched
            let _ = tx.send(service.top(k));
        });
        self.standings = LeaderboardState::Loading;
        self.pending_standings = Some(rx);
    }

    fn poll_standings(&mut self) {
        let Some(rx) = self.pending_standings.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(standings) => {
                debug!(entries = standings.entries().len(), "Leaderboard fetched");
                self.standings = standings;
                self.pending_standings = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                warn!("Leaderboard fetch ended without a result");
                self.standings = LeaderboardState::Unavailable {
                    message: "Leaderboard fetch did not finish".to_string(),
                };
                self.pending_standings = None;
            }
        }
    }

    fn editing_name(&self) -> bool {
        self.runtime.phase() == Phase::GameOver
            && matches!(self.form, Some(NameForm::Editing { .. }))
    }

    fn start(&mut self) {
        let effects = if self.runtime.phase() == Phase::GameOver {
            self.runtime.restart()
        } else {
            self.runtime.start()
        };

        if effects.playback().is_some() {
            self.form = None;
            self.status = "Watch the sequence.".to_string();
        }
    }

    fn click(&mut self, index: CellIndex) {
        let effects = self.runtime.click(index);
        self.report(&effects);
    }

    fn report(&mut self, effects: &Effects) {
        if let Some(score) = effects.game_over() {
            info!(score, "Game over");
            self.form = Some(NameForm::Editing {
                name: String::new(),
                error: None,
            });
            self.status = format!("Game over! Score {}. Type your name and press Enter.", score);
            return;
        }

        match (effects.verdict(), effects.dropped()) {
            (Some(Verdict::Continue), _) => {
                self.status = "Good, keep going.".to_string();
            }
            (Some(Verdict::RoundComplete), _) => {
                let score = self.runtime.machine().session().score();
                self.status = format!("Round cleared! Score {}.", score);
            }
            (_, Some(DroppedClick::NotAccepting(Phase::Playing))) => {
                self.status = "Wait for the sequence to finish.".to_string();
            }
            (_, Some(DroppedClick::NotAccepting(Phase::Idle))) => {
                self.status = "Press S to start.".to_string();
            }
            (_, Some(dropped)) => debug!(%dropped, "Click dropped"),
            _ => {}
        }
    }

    fn edit_name(&mut self, code: KeyCode) {
        let score = self.runtime.machine().session().score();
        let Some(NameForm::Editing { name, error }) = &mut self.form else {
            return;
        };

        match code {
            KeyCode::Char(c) if name.chars().count() < MAX_NAME_LEN => name.push(c),
            KeyCode::Backspace => {
                name.pop();
            }
            KeyCode::Enter => match self.leaderboard.submit(name, score) {
                SubmitStatus::Submitted(entry) => {
                    info!(entry_id = entry.id(), "Score saved");
                    let name = entry.name().clone();
                    self.form = Some(NameForm::Submitted { name });
                    self.fetch_standings();
                    self.status = "Score saved. Press R to play again.".to_string();
                }
                SubmitStatus::Rejected { message } | SubmitStatus::Failed { message } => {
                    *error = Some(message);
                }
            },
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_rush::{
        Board, ColorTag, GameStateMachine, MemoryScoreStore, PlaybackScheduler, ROUND_DELAY,
        ScriptedSource,
    };
    use std::time::Duration;

    fn app_with(leaderboard: LeaderboardService) -> App<ScriptedSource> {
        let board = Board::from_colors(ColorTag::ALL.into_iter().cycle().take(16));
        let machine =
            GameStateMachine::with_board(board, ScriptedSource::new(vec![5]), ROUND_DELAY);
        let runtime = GameRuntime::new(machine, PlaybackScheduler::default());
        App::new(runtime, leaderboard, 5, 4)
    }

    fn app() -> App<ScriptedSource> {
        app_with(LeaderboardService::new(MemoryScoreStore::new()))
    }

    /// Ticks until the background leaderboard fetch has landed.
    async fn settle_standings(app: &mut App<ScriptedSource>) {
        for _ in 0..2000 {
            app.tick();
            if app.standings() != &LeaderboardState::Loading {
                return;
            }
            // The fetch runs on a real thread; paused tokio time does not wait for it
            tokio::task::yield_now().await;
            std::thread::sleep(Duration::from_millis(1));
        }
        panic!("leaderboard fetch never finished");
    }

    fn press(app: &mut App<ScriptedSource>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App<ScriptedSource>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_game_and_submission() {
        let mut app = app();
        settle_standings(&mut app).await;
        assert_eq!(app.standings(), &LeaderboardState::Empty);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.runtime().phase(), Phase::Playing);

        // Clicks during playback are dropped, not queued
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.status(), "Wait for the sequence to finish.");
        assert!(app.runtime().machine().session().player_input().is_empty());

        assert!(app.runtime_mut().wait_for_input().await);
        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.runtime().machine().session().score(), 1);

        assert!(app.runtime_mut().wait_for_input().await);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.runtime().phase(), Phase::GameOver);
        assert!(matches!(app.form(), Some(NameForm::Editing { .. })));

        type_text(&mut app, "Ada");
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.form(),
            Some(&NameForm::Submitted {
                name: "Ada".to_string()
            })
        );
        assert_eq!(app.standings(), &LeaderboardState::Loading);
        settle_standings(&mut app).await;
        let entries = app.standings().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(*entries[0].score(), 1);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.runtime().phase(), Phase::Playing);
        assert!(app.form().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaderboard_loads_in_background() {
        let leaderboard = LeaderboardService::new(MemoryScoreStore::new());
        assert!(leaderboard.submit("Grace", 7).is_submitted());

        let mut app = app_with(leaderboard);
        assert_eq!(app.standings(), &LeaderboardState::Loading);

        settle_standings(&mut app).await;
        let LeaderboardState::Loaded(entries) = app.standings() else {
            panic!("expected loaded standings, got {:?}", app.standings());
        };
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name(), "Grace");
        assert_eq!(*entries[0].score(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cursor_click_with_enter() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert!(app.runtime_mut().wait_for_input().await);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.cursor(), 5);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.runtime().machine().session().score(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_name_form_edits_and_rejects_blank() {
        let mut app = app();
        press(&mut app, KeyCode::Char('s'));
        assert!(app.runtime_mut().wait_for_input().await);
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.runtime().phase(), Phase::GameOver);

        // Letters go into the name, not to restart
        type_text(&mut app, "r");
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);
        assert!(matches!(
            app.form(),
            Some(NameForm::Editing { error: Some(_), .. })
        ));

        type_text(&mut app, &"x".repeat(MAX_NAME_LEN + 5));
        let Some(NameForm::Editing { name, .. }) = app.form() else {
            panic!("form should still be editing");
        };
        assert_eq!(name.chars().count(), MAX_NAME_LEN);

        press(&mut app, KeyCode::F(2));
        assert_eq!(app.runtime().phase(), Phase::Playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_and_ctrl_c_quit() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit());

        let mut app = self::app();
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit());
    }
}
