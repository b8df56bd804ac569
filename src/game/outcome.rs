//! Structured results handed to tools and front ends
//!
//! Field names serialize in camelCase, matching the JSON the agent reads.

use super::state::GameStatus;
use crate::core::{Feedback, LetterResult, Word};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of submitting a whole word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOutcome {
    pub success: bool,
    /// Feedback for this guess, when accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    pub status: GameStatus,
    /// Why the guess was refused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Cumulative progress, only when accepted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameProgress>,
}

/// Cumulative game progress after an accepted guess
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameProgress {
    pub guesses: Vec<Word>,
    pub feedback: Vec<Feedback>,
    /// 1-based number of the guess just played
    pub guess_number: usize,
    pub guesses_remaining: usize,
    /// Revealed only when the game is lost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Word>,
}

/// Read-only view of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub guesses: Vec<Word>,
    pub feedback: Vec<Feedback>,
    pub status: GameStatus,
    pub keyboard_status: BTreeMap<char, LetterResult>,
    pub guesses_remaining: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Word>,
}
