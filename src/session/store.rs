//! Game storage behind the session registry
//!
//! The registry never owns a global map. It is handed a [`GameStore`], so
//! tests get isolated stores and deployments can swap in another backend as
//! long as each entry's mutations stay serialized.

use super::SharedGame;
use crate::game::GameState;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockWriteGuard};

/// Keyed storage of shared games
///
/// Creation hooks may refuse; a refused hook leaves the store untouched.
pub trait GameStore: Send + Sync {
    /// Game stored under `session_id`, if any
    fn get(&self, session_id: &str) -> Option<SharedGame>;

    /// Store `game` under `session_id`, replacing any previous entry
    fn set(&self, session_id: &str, game: SharedGame);

    /// Remove the entry; returns whether one existed
    fn delete(&self, session_id: &str) -> bool;

    /// Existing entry, or a new one built by `create` if none exists
    ///
    /// Check and insert happen atomically, so concurrent first calls for the
    /// same id agree on a single game and `create` runs at most once.
    ///
    /// # Errors
    ///
    /// Returns whatever `create` returns when it refuses.
    fn get_or_insert_with<E, F>(&self, session_id: &str, create: F) -> Result<SharedGame, E>
    where
        F: FnOnce() -> Result<GameState, E>;

    /// Replace the entry only if it is still `expected`
    ///
    /// Otherwise the current entry is returned and `create` is not called.
    /// A missing entry counts as replaceable.
    ///
    /// # Errors
    ///
    /// Returns whatever `create` returns when it refuses.
    fn replace_if<E, F>(
        &self,
        session_id: &str,
        expected: &SharedGame,
        create: F,
    ) -> Result<SharedGame, E>
    where
        F: FnOnce() -> Result<GameState, E>;

    /// Number of stored sessions
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process store
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    games: RwLock<FxHashMap<String, SharedGame>>,
}

impl MemoryGameStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, FxHashMap<String, SharedGame>> {
        // Map writes are single inserts/removes, so a poisoned map is still consistent
        self.games.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl GameStore for MemoryGameStore {
    fn get(&self, session_id: &str) -> Option<SharedGame> {
        let games = self.games.read().unwrap_or_else(PoisonError::into_inner);
        games.get(session_id).cloned()
    }

    fn set(&self, session_id: &str, game: SharedGame) {
        self.write().insert(session_id.to_string(), game);
    }

    fn delete(&self, session_id: &str) -> bool {
        self.write().remove(session_id).is_some()
    }

    fn get_or_insert_with<E, F>(&self, session_id: &str, create: F) -> Result<SharedGame, E>
    where
        F: FnOnce() -> Result<GameState, E>,
    {
        if let Some(game) = self.get(session_id) {
            return Ok(game);
        }

        let mut games = self.write();
        if let Some(game) = games.get(session_id) {
            return Ok(Arc::clone(game));
        }
        let game = Arc::new(Mutex::new(create()?));
        games.insert(session_id.to_string(), Arc::clone(&game));
        Ok(game)
    }

    fn replace_if<E, F>(
        &self,
        session_id: &str,
        expected: &SharedGame,
        create: F,
    ) -> Result<SharedGame, E>
    where
        F: FnOnce() -> Result<GameState, E>,
    {
        let mut games = self.write();
        if let Some(current) = games.get(session_id)
            && !Arc::ptr_eq(current, expected)
        {
            return Ok(Arc::clone(current));
        }
        let game = Arc::new(Mutex::new(create()?));
        games.insert(session_id.to_string(), Arc::clone(&game));
        Ok(game)
    }

    fn len(&self) -> usize {
        self.games.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
