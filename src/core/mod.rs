//! Core domain types for Wordle
//!
//! Pure, dependency-light types: words and the feedback produced by scoring
//! a guess against an answer.

mod feedback;
mod word;

pub use feedback::{Feedback, LetterResult, ScoreError, evaluate_guess};
pub use word::{WORD_LENGTH, Word, WordError};
