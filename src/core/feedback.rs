//! Wordle feedback calculation and representation
//!
//! Each guessed letter is scored as one of:
//! - `Absent` (gray): letter not in the answer, or all copies already used
//! - `Present` (yellow): letter in the answer, wrong position
//! - `Correct` (green): letter in the correct position

use super::word::{WORD_LENGTH, Word};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// Per-letter feedback
///
/// Ordered by how much it tells the player: `Absent < Present < Correct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterResult {
    Absent,
    Present,
    Correct,
}

impl LetterResult {
    /// Emoji square used when sharing results
    #[must_use]
    pub const fn emoji(self) -> char {
        match self {
            Self::Correct => '🟩',
            Self::Present => '🟨',
            Self::Absent => '⬜',
        }
    }
}

impl fmt::Display for LetterResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Correct => "correct",
            Self::Present => "present",
            Self::Absent => "absent",
        };
        f.write_str(name)
    }
}

/// Raised when a guess and an answer of different lengths are compared.
///
/// Both sides are always [`WORD_LENGTH`] in a running game, so this is a
/// caller bug rather than a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("guess length {guess} != answer length {answer}")]
    LengthMismatch { guess: usize, answer: usize },
}

/// Score `guess` against `answer` with duplicate-letter handling.
///
/// Comparison is case-insensitive and works for any equal length.
///
/// # Errors
/// Returns [`ScoreError::LengthMismatch`] if the lengths differ.
///
/// # Examples
/// ```
/// use wordle_arena::core::{LetterResult::*, evaluate_guess};
///
/// // ERASE holds an s and two unaligned e's; the d has no copy
/// let result = evaluate_guess("speed", "ERASE").unwrap();
/// assert_eq!(result, vec![Present, Absent, Present, Present, Absent]);
/// ```
pub fn evaluate_guess(guess: &str, answer: &str) -> Result<Vec<LetterResult>, ScoreError> {
    let guess: Vec<char> = guess.chars().flat_map(char::to_lowercase).collect();
    let answer: Vec<char> = answer.chars().flat_map(char::to_lowercase).collect();

    if guess.len() != answer.len() {
        return Err(ScoreError::LengthMismatch {
            guess: guess.len(),
            answer: answer.len(),
        });
    }

    let mut result = vec![LetterResult::Absent; guess.len()];
    score_into(&guess, &answer, &mut result);
    Ok(result)
}

/// Two-pass scoring shared by the string and `Word` entry points.
///
/// `guess`, `answer` and `out` have equal length; `out` starts all `Absent`.
fn score_into<T: Copy + Eq + Hash>(guess: &[T], answer: &[T], out: &mut [LetterResult]) {
    // Answer letters not consumed by an exact match
    let mut remaining: FxHashMap<T, usize> = FxHashMap::default();

    // First pass: greens, and build remaining pool
    for ((g, a), cell) in guess.iter().zip(answer).zip(out.iter_mut()) {
        if g == a {
            *cell = LetterResult::Correct;
        } else {
            *remaining.entry(*a).or_insert(0) += 1;
        }
    }

    // Second pass: yellows for non-greens, consuming from the pool
    for (g, cell) in guess.iter().zip(out.iter_mut()) {
        if *cell == LetterResult::Correct {
            continue;
        }
        if let Some(count) = remaining.get_mut(g)
            && *count > 0
        {
            *cell = LetterResult::Present;
            *count -= 1;
        }
    }
}

/// Feedback for one full-length guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback([LetterResult; WORD_LENGTH]);

impl Feedback {
    /// All greens
    pub const PERFECT: Self = Self([LetterResult::Correct; WORD_LENGTH]);

    /// Wrap raw per-position results
    #[must_use]
    pub const fn new(cells: [LetterResult; WORD_LENGTH]) -> Self {
        Self(cells)
    }

    /// Calculate the feedback when `guess` is played against `answer`
    ///
    /// # Examples
    /// ```
    /// use wordle_arena::core::{Feedback, Word};
    ///
    /// let guess = Word::new("crane").unwrap();
    /// let answer = Word::new("slate").unwrap();
    /// assert_eq!(Feedback::score(&guess, &answer).to_emoji(), "⬜⬜🟩⬜🟩");
    /// ```
    #[must_use]
    pub fn score(guess: &Word, answer: &Word) -> Self {
        let mut cells = [LetterResult::Absent; WORD_LENGTH];
        score_into(guess.chars(), answer.chars(), &mut cells);
        Self(cells)
    }

    /// Per-position results
    #[inline]
    #[must_use]
    pub const fn cells(&self) -> &[LetterResult; WORD_LENGTH] {
        &self.0
    }

    /// Check if this is a perfect match (all greens)
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        *self == Self::PERFECT
    }

    /// Convert to emoji string like "🟩🟨⬜🟩🟨"
    #[must_use]
    pub fn to_emoji(&self) -> String {
        self.0.iter().map(|r| r.emoji()).collect()
    }
}
