//! Game state machine
//!
//! Holds one game's progress and the rules that advance it.

mod outcome;
mod state;
mod stats;
mod transition;

pub use outcome::{GameProgress, GameSnapshot, GuessOutcome};
pub use state::{GameState, GameStatus, GuessRejection, InvalidGameState, MAX_GUESSES};
pub use stats::Statistics;
pub use transition::{NOT_ENOUGH_LETTERS, NOT_IN_WORD_LIST, Transition, transition};
