//! Game state and guess submission
//!
//! A [`GameState`] is one game's full progress. It only changes through
//! [`GameState::apply`] (interactive transitions) and
//! [`GameState::submit_word`] (whole-word submissions from tools), and both
//! route accepted guesses through the same scoring step.

use super::outcome::{GameProgress, GameSnapshot, GuessOutcome};
use crate::core::{Feedback, LetterResult, WORD_LENGTH, Word, WordError};
use crate::wordlists::WordLists;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Maximum number of guesses per game
pub const MAX_GUESSES: usize = 6;

/// Where a game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    /// `true` once the game is won or lost
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Playing => "playing",
            Self::Won => "won",
            Self::Lost => "lost",
        })
    }
}

/// Why a submitted word was not accepted
///
/// None of these consume a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuessRejection {
    #[error("Game is not in progress")]
    NotInProgress,
    #[error("Word must be exactly 5 letters")]
    WrongLength,
    #[error("Not in word list")]
    NotInWordList,
}

/// A stored game that breaks the game rules
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidGameState {
    #[error("{guesses} guesses but {feedback} feedback rows")]
    LengthMismatch { guesses: usize, feedback: usize },
    #[error("{0} guesses is more than {MAX_GUESSES}")]
    TooManyGuesses(usize),
    #[error("feedback for guess {0} does not match the answer")]
    WrongFeedback(usize),
    #[error("status {0} does not match the recorded guesses")]
    StatusMismatch(GameStatus),
    #[error("pending guess {0:?} is not at most {WORD_LENGTH} lowercase letters")]
    BadPendingGuess(String),
}

/// One game's progress
///
/// Deserialization checks the recorded guesses against the answer and the
/// status. The one inconsistent shape it lets through is a finished game with
/// no guesses, which the session registry restarts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawGameState")]
pub struct GameState {
    answer: Word,
    guesses: Vec<Word>,
    feedback: Vec<Feedback>,
    current_guess: String,
    status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGameState {
    answer: Word,
    #[serde(default)]
    guesses: Vec<Word>,
    #[serde(default)]
    feedback: Vec<Feedback>,
    #[serde(default)]
    current_guess: String,
    status: GameStatus,
    #[serde(default)]
    message: Option<String>,
}

impl TryFrom<RawGameState> for GameState {
    type Error = InvalidGameState;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        let played = raw.guesses.len();
        if played != raw.feedback.len() {
            return Err(InvalidGameState::LengthMismatch {
                guesses: played,
                feedback: raw.feedback.len(),
            });
        }
        if played > MAX_GUESSES {
            return Err(InvalidGameState::TooManyGuesses(played));
        }

        for (i, (guess, row)) in raw.guesses.iter().zip(&raw.feedback).enumerate() {
            if Feedback::score(guess, &raw.answer) != *row {
                return Err(InvalidGameState::WrongFeedback(i + 1));
            }
        }

        let expected = match raw.feedback.iter().position(Feedback::is_perfect) {
            Some(i) if i + 1 == played => GameStatus::Won,
            Some(_) => return Err(InvalidGameState::StatusMismatch(raw.status)),
            None if played == MAX_GUESSES => GameStatus::Lost,
            None => GameStatus::Playing,
        };
        let stale = played == 0 && raw.status.is_over();
        if raw.status != expected && !stale {
            return Err(InvalidGameState::StatusMismatch(raw.status));
        }

        let pending = &raw.current_guess;
        if pending.len() > WORD_LENGTH || !pending.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(InvalidGameState::BadPendingGuess(raw.current_guess));
        }

        Ok(Self {
            answer: raw.answer,
            guesses: raw.guesses,
            feedback: raw.feedback,
            current_guess: raw.current_guess,
            status: raw.status,
            message: raw.message,
        })
    }
}

impl GameState {
    /// Start a game against a known answer
    #[must_use]
    pub const fn new(answer: Word) -> Self {
        Self {
            answer,
            guesses: Vec::new(),
            feedback: Vec::new(),
            current_guess: String::new(),
            status: GameStatus::Playing,
            message: None,
        }
    }

    /// Start a game with a random answer from the lexicon
    pub fn start<R: Rng + ?Sized>(lexicon: &WordLists, rng: &mut R) -> Self {
        Self::new(lexicon.random_answer(rng))
    }

    /// The secret word
    ///
    /// Callers exposing state to players should use [`GameState::snapshot`] or
    /// [`GameState::submit_word`], which only reveal it after a loss.
    #[must_use]
    pub const fn answer(&self) -> &Word {
        &self.answer
    }

    /// Submitted guesses in submission order
    #[must_use]
    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    /// Feedback rows, aligned with [`GameState::guesses`]
    #[must_use]
    pub fn feedback(&self) -> &[Feedback] {
        &self.feedback
    }

    /// Pending letters of the interactive board
    #[must_use]
    pub fn current_guess(&self) -> &str {
        &self.current_guess
    }

    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.status
    }

    /// Transient note for the player (e.g. "Not in word list")
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Turns left; zero once the game is over
    #[must_use]
    pub fn guesses_remaining(&self) -> usize {
        if self.status.is_over() {
            0
        } else {
            MAX_GUESSES.saturating_sub(self.guesses.len())
        }
    }

    /// Best result seen for each guessed letter
    ///
    /// A letter that was ever `correct` stays `correct` even if it was
    /// `absent` elsewhere. Letters never guessed have no entry.
    #[must_use]
    pub fn keyboard_status(&self) -> BTreeMap<char, LetterResult> {
        let mut status = BTreeMap::new();
        for (guess, row) in self.guesses.iter().zip(&self.feedback) {
            for (&letter, &result) in guess.chars().iter().zip(row.cells()) {
                status
                    .entry(char::from(letter))
                    .and_modify(|best: &mut LetterResult| *best = (*best).max(result))
                    .or_insert(result);
            }
        }
        status
    }

    /// Read-only view for tools and front ends
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            guesses: self.guesses.clone(),
            feedback: self.feedback.clone(),
            status: self.status,
            keyboard_status: self.keyboard_status(),
            guesses_remaining: self.guesses_remaining(),
            answer: self.revealed_answer(),
        }
    }

    /// Submit a whole word (tool path)
    ///
    /// Invalid submissions leave the state untouched and report why.
    pub fn submit_word(&mut self, word: &str, lexicon: &WordLists) -> GuessOutcome {
        let guess = match self.validate(word, lexicon) {
            Ok(guess) => guess,
            Err(rejection) => {
                tracing::debug!(%rejection, word, "guess rejected");
                return GuessOutcome {
                    success: false,
                    feedback: None,
                    status: self.status,
                    message: Some(rejection.to_string()),
                    game_state: None,
                };
            }
        };

        let feedback = self.accept_guess(guess);
        GuessOutcome {
            success: true,
            feedback: Some(feedback),
            status: self.status,
            message: None,
            game_state: Some(GameProgress {
                guesses: self.guesses.clone(),
                feedback: self.feedback.clone(),
                guess_number: self.guesses.len(),
                guesses_remaining: self.guesses_remaining(),
                answer: self.revealed_answer(),
            }),
        }
    }

    /// Check that `input` may be played now
    ///
    /// # Errors
    ///
    /// Returns the [`GuessRejection`] describing why the word is refused.
    pub fn validate(&self, input: &str, lexicon: &WordLists) -> Result<Word, GuessRejection> {
        if self.status.is_over() || self.guesses.len() >= MAX_GUESSES {
            return Err(GuessRejection::NotInProgress);
        }

        let word = Word::new(input).map_err(|err| match err {
            WordError::InvalidLength(_) => GuessRejection::WrongLength,
            WordError::InvalidCharacters => GuessRejection::NotInWordList,
        })?;

        if lexicon.is_allowed(&word) {
            Ok(word)
        } else {
            Err(GuessRejection::NotInWordList)
        }
    }

    /// Score a validated guess and record it
    ///
    /// The guess, its feedback and the new status are written together so a
    /// guess is either fully applied or not at all.
    pub(super) fn accept_guess(&mut self, guess: Word) -> Feedback {
        debug_assert!(!self.status.is_over() && self.guesses.len() < MAX_GUESSES);

        let feedback = Feedback::score(&guess, &self.answer);
        tracing::debug!(guess = %guess, feedback = %feedback.to_emoji(), "guess accepted");

        self.guesses.push(guess);
        self.feedback.push(feedback);
        self.current_guess.clear();
        self.message = None;

        self.status = if feedback.is_perfect() {
            GameStatus::Won
        } else if self.guesses.len() >= MAX_GUESSES {
            GameStatus::Lost
        } else {
            GameStatus::Playing
        };

        feedback
    }

    /// The answer, but only once the game is lost
    fn revealed_answer(&self) -> Option<Word> {
        (self.status == GameStatus::Lost).then(|| self.answer.clone())
    }

    pub(super) fn push_letter(&mut self, letter: char) {
        if self.current_guess.len() < WORD_LENGTH {
            self.current_guess.push(letter);
        }
    }

    pub(super) fn pop_letter(&mut self) -> Option<char> {
        self.current_guess.pop()
    }

    pub(super) fn set_message(&mut self, message: Option<String>) {
        self.message = message;
    }
}
