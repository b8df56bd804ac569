//! TUI application state and key handling

use crate::game::{GameState, GameStatus, Statistics, Transition};
use crate::wordlists::WordLists;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;

/// Application state
pub struct App<'a> {
    pub lexicon: &'a WordLists,
    pub game: GameState,
    pub stats: Statistics,
    pub should_quit: bool,
    rng: StdRng,
    recorded: bool,
}

impl<'a> App<'a> {
    #[must_use]
    pub fn new(lexicon: &'a WordLists) -> Self {
        Self::with_rng(lexicon, StdRng::from_os_rng())
    }

    /// App whose answers are reproducible
    #[must_use]
    pub fn seeded(lexicon: &'a WordLists, seed: u64) -> Self {
        Self::with_rng(lexicon, StdRng::seed_from_u64(seed))
    }

    fn with_rng(lexicon: &'a WordLists, mut rng: StdRng) -> Self {
        let game = GameState::start(lexicon, &mut rng);
        Self {
            lexicon,
            game,
            stats: Statistics::default(),
            should_quit: false,
            rng,
            recorded: false,
        }
    }

    /// Replace the board with a fresh game
    pub fn new_game(&mut self) {
        let answer = self.lexicon.random_answer(&mut self.rng);
        self.game.apply(Transition::NewGame { answer }, self.lexicon);
        self.recorded = false;
    }

    fn apply(&mut self, action: Transition) {
        self.game.apply(action, self.lexicon);
    }

    fn submit(&mut self) {
        self.apply(Transition::SubmitGuess);
        if !self.game.status().is_over() || self.recorded {
            return;
        }

        self.stats.record(&self.game);
        self.recorded = true;

        let message = match self.game.status() {
            GameStatus::Won => celebration(self.game.guesses().len()).to_string(),
            _ => self.game.answer().text().to_uppercase(),
        };
        self.apply(Transition::SetMessage(Some(message)));
    }

    /// React to one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let over = self.game.status().is_over();

        match key.code {
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('n') if ctrl => self.new_game(),
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('q') if over => self.should_quit = true,
            KeyCode::Char('n') | KeyCode::Enter if over => self.new_game(),
            KeyCode::Char(c) if c.is_ascii_alphabetic() => self.apply(Transition::AddLetter(c)),
            KeyCode::Backspace => self.apply(Transition::RemoveLetter),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
    }
}

/// Message for a win in `guesses` tries
#[must_use]
pub const fn celebration(guesses: usize) -> &'static str {
    match guesses {
        1 => "Genius",
        2 => "Magnificent",
        3 => "Impressive",
        4 => "Splendid",
        5 => "Great",
        _ => "Phew",
    }
}

/// Run the TUI application
///
/// # Errors
///
/// Returns an error if terminal setup/cleanup fails or if there's an I/O error
/// during rendering or event handling.
pub fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {err}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, mut app: App) -> Result<()> {
    loop {
        terminal.draw(|f| super::rendering::ui(f, &app))?;

        if let Event::Key(key) = event::read()? {
            // Only process key press events (fixes Windows double-input bug)
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
