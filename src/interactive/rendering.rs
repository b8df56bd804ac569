//! TUI rendering with ratatui

use super::app::App;
use crate::core::{LetterResult, WORD_LENGTH};
use crate::game::{GameStatus, MAX_GUESSES};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};
use std::collections::BTreeMap;

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Main UI rendering function
pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(14), // Board
            Constraint::Length(3),  // Message
            Constraint::Length(5),  // Keyboard
            Constraint::Min(3),     // Status bar
        ])
        .split(f.area());

    render_header(f, chunks[0]);
    render_board(f, app, chunks[1]);
    render_message(f, app, chunks[2]);
    render_keyboard(f, app, chunks[3]);
    render_status(f, app, chunks[4]);
}

fn cell_style(result: LetterResult) -> Style {
    let bg = match result {
        LetterResult::Correct => Color::Green,
        LetterResult::Present => Color::Yellow,
        LetterResult::Absent => Color::DarkGray,
    };
    Style::new().fg(Color::Black).bg(bg).add_modifier(Modifier::BOLD)
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new("WORDLE")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

/// One row of the board: a scored guess, the pending input, or blanks
fn board_row(app: &App, row: usize) -> Line<'static> {
    let game = &app.game;
    let mut spans = Vec::with_capacity(WORD_LENGTH * 2);

    if let (Some(guess), Some(feedback)) = (game.guesses().get(row), game.feedback().get(row)) {
        for (letter, result) in guess.text().chars().zip(feedback.cells()) {
            spans.push(Span::styled(
                format!(" {} ", letter.to_ascii_uppercase()),
                cell_style(*result),
            ));
            spans.push(Span::raw(" "));
        }
    } else if row == game.guesses().len() && !game.status().is_over() {
        let pending: Vec<char> = game.current_guess().chars().collect();
        for i in 0..WORD_LENGTH {
            let text = pending
                .get(i)
                .map_or_else(|| " _ ".to_string(), |c| format!(" {} ", c.to_ascii_uppercase()));
            spans.push(Span::styled(
                text,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" "));
        }
    } else {
        for _ in 0..WORD_LENGTH {
            spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::raw(" "));
        }
    }

    Line::from(spans)
}

fn render_board(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::with_capacity(MAX_GUESSES * 2);
    for row in 0..MAX_GUESSES {
        lines.push(board_row(app, row));
        lines.push(Line::from(""));
    }

    let board = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .title(" Board ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded),
    );
    f.render_widget(board, area);
}

fn render_message(f: &mut Frame, app: &App, area: Rect) {
    let color = match app.game.status() {
        GameStatus::Won => Color::Green,
        GameStatus::Lost => Color::Red,
        GameStatus::Playing => Color::Yellow,
    };
    let text = app.game.message().unwrap_or_default().to_string();

    let message = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

fn keyboard_line(row: &str, known: &BTreeMap<char, LetterResult>) -> Line<'static> {
    let spans: Vec<Span> = row
        .chars()
        .flat_map(|key| {
            let label = format!(" {} ", key.to_ascii_uppercase());
            let key_span = known.get(&key).map_or_else(
                || Span::styled(label.clone(), Style::default().fg(Color::White)),
                |result| Span::styled(label.clone(), cell_style(*result)),
            );
            [key_span, Span::raw(" ")]
        })
        .collect();
    Line::from(spans)
}

fn render_keyboard(f: &mut Frame, app: &App, area: Rect) {
    let known = app.game.keyboard_status();
    let lines: Vec<Line> = KEYBOARD_ROWS
        .iter()
        .map(|row| keyboard_line(row, &known))
        .collect();

    let keyboard = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title(" Keyboard ").borders(Borders::ALL));
    f.render_widget(keyboard, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let remaining = format!("Guesses left: {}", app.game.guesses_remaining());
    f.render_widget(Paragraph::new(remaining).alignment(Alignment::Center), chunks[0]);

    let stats_text = format!(
        "Games: {} | Win Rate: {:.0}%",
        app.stats.total_games,
        app.stats.win_rate()
    );
    f.render_widget(Paragraph::new(stats_text).alignment(Alignment::Center), chunks[1]);

    let streak = format!(
        "Streak: {} (best {})",
        app.stats.current_streak, app.stats.max_streak
    );
    f.render_widget(Paragraph::new(streak).alignment(Alignment::Center), chunks[2]);

    let help_text = if app.game.status().is_over() {
        "Enter/n: New Game | q: Quit"
    } else {
        "Enter: Submit | Ctrl-N: New Game | Esc: Quit"
    };
    let help = Paragraph::new(help_text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[3]);
}
