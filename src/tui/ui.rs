//! Stateless rendering of the board, HUD, leaderboard and score form.

use color_rush::{BoardView, CellView, ColorTag, LeaderboardState, Phase, UniformSource};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

use super::app::{App, NameForm};
use super::input;

/// Renders one frame.
pub fn draw<S: UniformSource>(frame: &mut Frame, app: &App<S>) {
    let view = app.view();
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and HUD
            Constraint::Min(8),    // Board and leaderboard
            Constraint::Length(3), // Status
        ])
        .split(area);

    draw_hud(frame, chunks[0], &view);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(24), Constraint::Length(30)])
        .split(chunks[1]);

    draw_board(frame, body[0], &view, app.columns(), app.cursor());
    draw_leaderboard(frame, body[1], app.standings());

    let status = Paragraph::new(app.status())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    if view.phase == Phase::GameOver
        && let Some(form) = app.form()
    {
        draw_game_over(frame, area, view.score, form);
    }
}

fn draw_hud(frame: &mut Frame, area: Rect, view: &BoardView) {
    let label_style = match view.phase {
        Phase::Idle => Style::default().fg(Color::Cyan),
        Phase::Playing => Style::default().fg(Color::Magenta),
        Phase::AwaitingInput => Style::default().fg(Color::Green),
        Phase::GameOver => Style::default().fg(Color::Red),
    };

    let hud = Line::from(vec![
        Span::styled("Color Rush", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("   Score: "),
        Span::styled(view.score.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(view.label, label_style.add_modifier(Modifier::BOLD)),
        Span::raw(format!("   {}/{}", view.input_len, view.sequence_len)),
    ]);

    let paragraph = Paragraph::new(hud)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

fn draw_board(frame: &mut Frame, area: Rect, view: &BoardView, columns: usize, cursor: usize) {
    let columns = columns.max(1);
    let rows = view.cells.len().div_ceil(columns).max(1);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    for (row, chunk) in view.cells.chunks(columns).enumerate() {
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_areas[row]);

        for (col, cell) in chunk.iter().enumerate() {
            draw_cell(frame, col_areas[col], cell, cell.index == cursor);
        }
    }
}

fn draw_cell(frame: &mut Frame, area: Rect, cell: &CellView, under_cursor: bool) {
    let color = tag_color(cell.color);

    let body_style = if cell.active {
        Style::default().bg(color).fg(Color::Black).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(color).add_modifier(Modifier::DIM)
    };

    let border_style = if under_cursor {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = input::key_for_index(cell.index)
        .map(|key| format!(" {} ", key))
        .unwrap_or_default();

    let fill = if cell.active { "████" } else { "░░░░" };
    let paragraph = Paragraph::new(fill)
        .style(body_style)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );
    frame.render_widget(paragraph, area);
}

fn tag_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Red => Color::Red,
        ColorTag::Blue => Color::Blue,
        ColorTag::Green => Color::Green,
        ColorTag::Yellow => Color::Yellow,
    }
}

fn draw_leaderboard(frame: &mut Frame, area: Rect, standings: &LeaderboardState) {
    let block = Block::default().title(" Leaderboard ").borders(Borders::ALL);

    match standings {
        LeaderboardState::Loading => {
            let paragraph = Paragraph::new("Loading leaderboard...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
        }
        LeaderboardState::Loaded(entries) => {
            let items: Vec<ListItem> = entries
                .iter()
                .enumerate()
                .map(|(rank, entry)| {
                    ListItem::new(format!(
                        "{:>2}. {:<20} {:>3}",
                        rank + 1,
                        entry.name(),
                        entry.score()
                    ))
                })
                .collect();
            frame.render_widget(List::new(items).block(block), area);
        }
        LeaderboardState::Empty => {
            let paragraph = Paragraph::new("No scores yet.")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
        }
        LeaderboardState::Unavailable { .. } => {
            let paragraph = Paragraph::new("Leaderboard unavailable.")
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(paragraph, area);
        }
    }
}

fn draw_game_over(frame: &mut Frame, area: Rect, score: u32, form: &NameForm) {
    let popup = center_rect(area, 44, 9);
    frame.render_widget(Clear, popup);

    let mut lines = vec![
        Line::from(Span::styled(
            "GAME OVER",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Score: {}", score)),
        Line::from(""),
    ];

    match form {
        NameForm::Editing { name, error } => {
            lines.push(Line::from(vec![
                Span::raw("Name: "),
                Span::styled(format!("{}_", name), Style::default().add_modifier(Modifier::BOLD)),
            ]));
            if let Some(error) = error {
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::default().fg(Color::Red),
                )));
            }
            lines.push(Line::from("Enter to submit, F2 to play again"));
        }
        NameForm::Submitted { name } => {
            lines.push(Line::from(format!("Saved as {}.", name)));
            lines.push(Line::from("Press R to play again"));
        }
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, popup);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
