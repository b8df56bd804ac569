//! Formatting utilities for terminal output

use crate::core::{Feedback, LetterResult, Word};
use colored::{ColoredString, Colorize};
use std::collections::BTreeMap;

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// One letter tile
fn tile(letter: char, result: Option<LetterResult>) -> ColoredString {
    let text = format!(" {} ", letter.to_ascii_uppercase());
    match result {
        Some(LetterResult::Correct) => text.black().on_green().bold(),
        Some(LetterResult::Present) => text.black().on_yellow().bold(),
        Some(LetterResult::Absent) => text.white().on_bright_black(),
        None => text.bright_white(),
    }
}

/// A scored guess as a row of colored tiles
#[must_use]
pub fn colored_guess(word: &Word, feedback: &Feedback) -> String {
    word.text()
        .chars()
        .zip(feedback.cells())
        .map(|(letter, result)| tile(letter, Some(*result)).to_string())
        .collect()
}

/// Keyboard rows with each tried letter colored by its best result
#[must_use]
pub fn colored_keyboard(known: &BTreeMap<char, LetterResult>) -> Vec<String> {
    KEYBOARD_ROWS
        .iter()
        .map(|row| {
            row.chars()
                .map(|key| tile(key, known.get(&key).copied()).to_string())
                .collect()
        })
        .collect()
}

/// Guess and emoji feedback, e.g. `CRANE 🟩⬜⬜🟨⬜`
#[must_use]
pub fn emoji_row(word: &Word, feedback: &Feedback) -> String {
    format!("{} {}", word.text().to_uppercase(), feedback.to_emoji())
}

/// Create a progress bar string
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn create_progress_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return "░".repeat(width);
    }
    // Cast is safe: values are clamped to [0, width]
    let filled = ((value / max) * width as f64).max(0.0) as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
