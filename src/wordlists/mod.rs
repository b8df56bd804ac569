//! Word lists for Wordle
//!
//! Provides embedded word lists compiled into the binary for zero-cost access,
//! and [`WordLists`], the immutable lexicon shared by every game.

mod embedded;
pub mod loader;

pub use embedded::{ALLOWED, ALLOWED_COUNT, ANSWERS, ANSWERS_COUNT};

use crate::core::Word;
use rand::Rng;
use rustc_hash::FxHashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while building a lexicon
#[derive(Debug, Error)]
pub enum WordListError {
    #[error("could not read word list {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("answer list contains no valid words")]
    NoAnswers,
}

/// The answer list plus the allowed-guess set
///
/// Built once per process and never mutated, so it can be shared across
/// threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct WordLists {
    answers: Vec<Word>,
    allowed: FxHashSet<Word>,
}

impl WordLists {
    /// Build a lexicon from answer words and extra guess-only words
    ///
    /// The allowed set is the union of both, so every answer is guessable.
    ///
    /// # Errors
    ///
    /// Returns [`WordListError::NoAnswers`] if `answers` is empty.
    pub fn new(answers: Vec<Word>, extra_guesses: Vec<Word>) -> Result<Self, WordListError> {
        if answers.is_empty() {
            return Err(WordListError::NoAnswers);
        }

        let allowed = answers.iter().cloned().chain(extra_guesses).collect();
        Ok(Self { answers, allowed })
    }

    /// Lexicon compiled into the binary
    #[must_use]
    pub fn embedded() -> Self {
        let answers = loader::words_from_slice(ANSWERS);
        let allowed = answers
            .iter()
            .cloned()
            .chain(loader::words_from_slice(ALLOWED))
            .collect();
        Self { answers, allowed }
    }

    /// Build from optional files, falling back to the embedded lists
    ///
    /// # Errors
    ///
    /// Returns an error if a given file cannot be read or the answer list is empty.
    pub fn load(answers: Option<&Path>, allowed: Option<&Path>) -> Result<Self, WordListError> {
        if answers.is_none() && allowed.is_none() {
            return Ok(Self::embedded());
        }

        let answer_words = match answers {
            Some(path) => loader::load_from_file(path)?,
            None => loader::words_from_slice(ANSWERS),
        };
        let extra = match allowed {
            Some(path) => loader::load_from_file(path)?,
            None => loader::words_from_slice(ALLOWED),
        };

        Self::new(answer_words, extra)
    }

    /// Candidate secret words
    #[must_use]
    pub fn answers(&self) -> &[Word] {
        &self.answers
    }

    /// Number of words accepted as guesses
    #[must_use]
    pub fn allowed_count(&self) -> usize {
        self.allowed.len()
    }

    /// Check whether a word is accepted as a guess
    #[must_use]
    pub fn is_allowed(&self, word: &Word) -> bool {
        self.allowed.contains(word)
    }

    /// Pick a uniformly random answer
    pub fn random_answer<R: Rng + ?Sized>(&self, rng: &mut R) -> Word {
        // Non-empty by construction
        let idx = rng.random_range(0..self.answers.len());
        self.answers[idx].clone()
    }
}

#[cfg(test)]
pub(crate) fn test_lexicon(answers: &[&str], extra: &[&str]) -> WordLists {
    WordLists::new(loader::words_from_slice(answers), loader::words_from_slice(extra)).unwrap()
}
