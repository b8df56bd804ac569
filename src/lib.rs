//! Wordle Arena
//!
//! A Wordle engine shared by a terminal board and a tool-driven agent player.
//!
//! # Quick Start
//!
//! ```rust
//! use wordle_arena::core::{LetterResult, evaluate_guess};
//!
//! let feedback = evaluate_guess("crane", "slate").unwrap();
//! assert_eq!(feedback[2], LetterResult::Correct);
//! ```

// Core domain types
pub mod core;

// Word lists
pub mod wordlists;

// Game state machine
pub mod game;

// Per-conversation games
pub mod session;

// Tools, loop policy and the local guesser
pub mod agent;

// Command implementations
pub mod commands;

// Terminal output formatting
pub mod output;

// Interactive TUI interface
pub mod interactive;

// Logging setup
pub mod observability;
