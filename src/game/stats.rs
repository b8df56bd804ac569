//! Win/loss statistics across games

use super::state::{GameState, GameStatus, MAX_GUESSES};

/// Running totals for finished games
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub total_games: usize,
    pub games_won: usize,
    /// Wins by number of guesses; index 0 is unused
    pub guess_distribution: [usize; MAX_GUESSES + 1],
    pub current_streak: usize,
    pub max_streak: usize,
}

impl Statistics {
    /// Count one finished game
    ///
    /// Games still in progress are ignored.
    pub fn record(&mut self, game: &GameState) {
        match game.status() {
            GameStatus::Playing => {}
            GameStatus::Won => self.record_win(game.guesses().len()),
            GameStatus::Lost => self.record_loss(),
        }
    }

    pub fn record_win(&mut self, guesses: usize) {
        self.total_games += 1;
        self.games_won += 1;
        if let Some(slot) = self.guess_distribution.get_mut(guesses) {
            *slot += 1;
        }
        self.current_streak += 1;
        self.max_streak = self.max_streak.max(self.current_streak);
    }

    pub fn record_loss(&mut self) {
        self.total_games += 1;
        self.current_streak = 0;
    }

    /// Fold another set of totals into this one (streaks are not merged)
    pub fn merge(&mut self, other: &Self) {
        self.total_games += other.total_games;
        self.games_won += other.games_won;
        for (mine, theirs) in self.guess_distribution.iter_mut().zip(other.guess_distribution) {
            *mine += theirs;
        }
    }

    /// Percentage of games won
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            return 0.0;
        }
        self.games_won as f64 / self.total_games as f64 * 100.0
    }

    /// Mean guesses over won games
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_guesses(&self) -> f64 {
        if self.games_won == 0 {
            return 0.0;
        }
        let total: usize = self
            .guess_distribution
            .iter()
            .enumerate()
            .map(|(guesses, count)| guesses * count)
            .sum();
        total as f64 / self.games_won as f64
    }
}
