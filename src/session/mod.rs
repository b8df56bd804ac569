//! Per-session game registry for the agent-driven variant
//!
//! Each session id owns one [`SharedGame`]. The per-game mutex is the only
//! lock held while a guess is applied, so sessions never contend with each
//! other.

mod quota;
mod registry;
mod store;

pub use quota::{GameQuota, PerClientQuota, QuotaExceeded, Unlimited};
pub use registry::{GameOptions, SessionRegistry};
pub use store::{GameStore, MemoryGameStore};

use crate::game::GameState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A game shared between every lookup of one session id
pub type SharedGame = Arc<Mutex<GameState>>;

/// Lock a shared game
///
/// Guesses are applied in one step, so a game whose previous holder panicked
/// is still consistent and is handed out as-is.
pub fn lock_game(game: &SharedGame) -> MutexGuard<'_, GameState> {
    game.lock().unwrap_or_else(PoisonError::into_inner)
}
