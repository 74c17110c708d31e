//! Terminal front end for Color Rush.

mod app;
mod input;
mod ui;

use anyhow::Result;
use color_rush::{GameRuntime, LeaderboardService, UniformSource};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::time::{Duration, sleep};
use tracing::{error, info, instrument};

use app::App;

/// How long to wait for a key before drawing the next frame.
const FRAME_POLL: Duration = Duration::from_millis(10);

/// Runs the game in the terminal until the player quits.
///
/// Logging goes to `log_path` so it does not interfere with the screen.
pub async fn run_tui<S: UniformSource>(
    runtime: GameRuntime<S>,
    leaderboard: LeaderboardService,
    leaderboard_size: usize,
    columns: usize,
    log_path: &str,
) -> Result<()> {
    let log_file = std::fs::File::create(log_path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!("Starting Color Rush TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(runtime, leaderboard, leaderboard_size, columns);
    let res = run_app(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!(error = ?err, "Game loop error");
    }
    info!("TUI closed");
    res
}

/// Draw, read keys, apply playback cues, repeat.
#[instrument(skip_all)]
async fn run_app<S: UniformSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App<S>,
) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(FRAME_POLL)?
            && let Event::Key(key) = event::read()?
        {
            app.handle_key(key);
        }

        if app.should_quit() {
            return Ok(());
        }

        // Let playback timers run between frames
        sleep(FRAME_POLL).await;
    }
}
