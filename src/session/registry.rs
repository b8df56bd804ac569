//! Session registry
//!
//! Gives a stateless request/response handler memory across calls: each
//! session id maps to one shared game, and every lookup returns a handle to
//! the same game so mutations accumulate.

use super::store::{GameStore, MemoryGameStore};
use super::{SharedGame, lock_game};
use crate::game::GameState;
use crate::wordlists::WordLists;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

/// Options for [`SessionRegistry::get_or_create`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GameOptions {
    /// Replace any existing game with a fresh one
    pub new_game: bool,
}

impl GameOptions {
    pub const NEW_GAME: Self = Self { new_game: true };
}

/// Maps session ids to shared games
pub struct SessionRegistry<S = MemoryGameStore> {
    store: S,
    lexicon: Arc<WordLists>,
    rng: Mutex<StdRng>,
}

impl SessionRegistry<MemoryGameStore> {
    /// Registry backed by an in-process map
    #[must_use]
    pub fn in_memory(lexicon: Arc<WordLists>) -> Self {
        Self::new(MemoryGameStore::new(), lexicon)
    }
}

impl<S: GameStore> SessionRegistry<S> {
    #[must_use]
    pub fn new(store: S, lexicon: Arc<WordLists>) -> Self {
        Self {
            store,
            lexicon,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Make answer selection reproducible
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    /// Lexicon used to pick answers and validate guesses
    #[must_use]
    pub fn lexicon(&self) -> &WordLists {
        &self.lexicon
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// A new game with a random answer, not yet stored anywhere
    #[must_use]
    pub fn fresh_game(&self) -> GameState {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        GameState::start(&self.lexicon, &mut *rng)
    }

    /// Existing game for `session_id`, or a fresh one
    ///
    /// A fresh game is created when none exists or `options.new_game` is set;
    /// it replaces any previous entry.
    pub fn get_or_create(&self, session_id: &str, options: GameOptions) -> SharedGame {
        into_ok(self.try_get_or_create(session_id, options, admit_all))
    }

    /// [`SessionRegistry::get_or_create`], asking `admit` before creating
    ///
    /// `admit` runs only when a game is actually created, at most once.
    ///
    /// # Errors
    ///
    /// Returns the error from `admit`; the stored entry is then unchanged.
    pub fn try_get_or_create<E>(
        &self,
        session_id: &str,
        options: GameOptions,
        admit: impl FnOnce() -> Result<(), E>,
    ) -> Result<SharedGame, E> {
        if options.new_game {
            admit()?;
            let game = Arc::new(Mutex::new(self.fresh_game()));
            self.store.set(session_id, Arc::clone(&game));
            tracing::info!(session = session_id, "new game started");
            return Ok(game);
        }

        self.store.get_or_insert_with(session_id, || {
            admit()?;
            tracing::info!(session = session_id, "game created for new session");
            Ok(self.fresh_game())
        })
    }

    /// Existing game for `session_id`, without creating one
    #[must_use]
    pub fn get_game(&self, session_id: &str) -> Option<SharedGame> {
        self.store.get(session_id)
    }

    /// Game ready to accept guesses on behalf of a tool call
    ///
    /// A finished game with no guesses was never really played; it shows up
    /// when the store lost its contents while a client kept its old session id.
    /// Such a game is replaced instead of reporting a stale final status.
    pub fn get_playable(&self, session_id: &str, options: GameOptions) -> SharedGame {
        into_ok(self.try_get_playable(session_id, options, admit_all))
    }

    /// [`SessionRegistry::get_playable`], asking `admit` before each creation
    ///
    /// The stale-game restart is a compare-and-swap on the store, so callers
    /// racing on the same stale entry all end up with the one replacement.
    ///
    /// # Errors
    ///
    /// Returns the error from `admit`; the stored entry is then unchanged.
    pub fn try_get_playable<E>(
        &self,
        session_id: &str,
        options: GameOptions,
        mut admit: impl FnMut() -> Result<(), E>,
    ) -> Result<SharedGame, E> {
        let game = self.try_get_or_create(session_id, options, &mut admit)?;

        let stale = {
            let state = lock_game(&game);
            state.status().is_over() && state.guesses().is_empty()
        };
        if !stale {
            return Ok(game);
        }

        tracing::warn!(session = session_id, "stale finished game without guesses, restarting");
        self.store.replace_if(session_id, &game, || {
            admit()?;
            Ok(self.fresh_game())
        })
    }

    /// Forget a session; returns whether it existed
    pub fn end_session(&self, session_id: &str) -> bool {
        self.store.delete(session_id)
    }

    /// Number of tracked sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

const fn admit_all() -> Result<(), Infallible> {
    Ok(())
}

fn into_ok<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use crate::session::MemoryGameStore;
    use crate::wordlists::test_lexicon;
    use std::thread;
    use std::time::Duration;

    fn registry() -> SessionRegistry {
        let lexicon = test_lexicon(&["crane", "slate", "irate"], &["salet", "adieu"]);
        SessionRegistry::in_memory(Arc::new(lexicon)).with_seed(42)
    }

    #[test]
    fn get_or_create_twice_shares_state() {
        let registry = registry();

        let first = registry.get_or_create("conv-1", GameOptions::default());
        let outcome = lock_game(&first).submit_word("salet", registry.lexicon());
        assert!(outcome.success);

        let second = registry.get_or_create("conv-1", GameOptions::default());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(lock_game(&second).guesses().len(), 1);
    }

    #[test]
    fn new_game_replaces_entry() {
        let registry = registry();
        let first = registry.get_or_create("conv-1", GameOptions::default());
        lock_game(&first).submit_word("adieu", registry.lexicon());

        let replaced = registry.get_or_create("conv-1", GameOptions::NEW_GAME);
        assert!(!Arc::ptr_eq(&first, &replaced));
        assert!(lock_game(&replaced).guesses().is_empty());
        assert!(Arc::ptr_eq(&replaced, &registry.get_game("conv-1").unwrap()));
    }

    #[test]
    fn get_game_does_not_create() {
        let registry = registry();
        assert!(registry.get_game("missing").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn sessions_are_independent() {
        let registry = registry();
        let a = registry.get_or_create("a", GameOptions::default());
        registry.get_or_create("b", GameOptions::default());

        lock_game(&a).submit_word("salet", registry.lexicon());

        let b = registry.get_game("b").unwrap();
        assert!(lock_game(&b).guesses().is_empty());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn answers_come_from_answer_list() {
        let registry = registry();
        for i in 0..50 {
            let game = registry.get_or_create(&format!("s{i}"), GameOptions::default());
            let answer = lock_game(&game).answer().clone();
            assert!(registry.lexicon().answers().contains(&answer));
        }
    }

    /// Memory store that is slow to look up, like a remote key-value store
    #[derive(Default)]
    struct SlowStore(MemoryGameStore);

    impl GameStore for SlowStore {
        fn get(&self, session_id: &str) -> Option<SharedGame> {
            self.0.get(session_id)
        }

        fn set(&self, session_id: &str, game: SharedGame) {
            self.0.set(session_id, game);
        }

        fn delete(&self, session_id: &str) -> bool {
            self.0.delete(session_id)
        }

        fn get_or_insert_with<E, F>(&self, session_id: &str, create: F) -> Result<SharedGame, E>
        where
            F: FnOnce() -> Result<GameState, E>,
        {
            let game = self.0.get_or_insert_with(session_id, create);
            thread::sleep(Duration::from_millis(20));
            game
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
            self.0.replace_if(session_id, expected, create)
        }

        fn len(&self) -> usize {
            self.0.len()
        }
    }

    fn stale_game() -> SharedGame {
        let stale: GameState = serde_json::from_value(serde_json::json!({
            "answer": "crane",
            "guesses": [],
            "feedback": [],
            "status": "lost"
        }))
        .unwrap();
        Arc::new(Mutex::new(stale))
    }

    #[test]
    fn racing_stale_restarts_share_one_game() {
        let lexicon = test_lexicon(&["crane", "slate", "irate"], &["salet", "adieu"]);
        let registry = SessionRegistry::new(SlowStore::default(), Arc::new(lexicon)).with_seed(1);
        registry.store().set("old", stale_game());

        let accepted = thread::scope(|scope| {
            let handles: Vec<_> = ["salet", "adieu"]
                .into_iter()
                .map(|word| {
                    let registry = &registry;
                    scope.spawn(move || {
                        let game = registry.get_playable("old", GameOptions::default());
                        let outcome = lock_game(&game).submit_word(word, registry.lexicon());
                        outcome.success
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .filter(|&success| success)
                .count()
        });

        let game = registry.get_game("old").unwrap();
        assert_eq!(accepted, 2);
        assert_eq!(lock_game(&game).guesses().len(), 2);
    }

    #[test]
    fn admit_runs_only_on_creation() {
        let registry = registry();
        let mut admitted = 0;

        registry
            .try_get_or_create("s", GameOptions::default(), || {
                admitted += 1;
                Ok::<_, ()>(())
            })
            .unwrap();
        registry
            .try_get_or_create("s", GameOptions::default(), || {
                admitted += 1;
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(admitted, 1);

        let refused = registry.try_get_or_create("t", GameOptions::default(), || Err("full"));
        assert_eq!(refused.err(), Some("full"));
        assert!(registry.get_game("t").is_none());

        let refused = registry.try_get_or_create("s", GameOptions::NEW_GAME, || Err("full"));
        assert!(refused.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn stale_restart_is_admitted_like_a_new_game() {
        let registry = registry();
        let stale = stale_game();
        registry.store().set("old", Arc::clone(&stale));

        let refused = registry.try_get_playable("old", GameOptions::default(), || Err("full"));
        assert!(refused.is_err());
        assert!(Arc::ptr_eq(&stale, &registry.get_game("old").unwrap()));

        let mut admitted = 0;
        let game = registry
            .try_get_playable("old", GameOptions::default(), || {
                admitted += 1;
                Ok::<_, ()>(())
            })
            .unwrap();
        assert_eq!(admitted, 1);
        assert_eq!(lock_game(&game).status(), GameStatus::Playing);
    }

    #[test]
    fn stale_finished_game_is_restarted() {
        let registry = registry();
        registry.store().set("old", stale_game());

        let game = registry.get_playable("old", GameOptions::default());
        assert_eq!(lock_game(&game).status(), GameStatus::Playing);
        assert!(Arc::ptr_eq(&game, &registry.get_game("old").unwrap()));
    }

    #[test]
    fn finished_game_with_guesses_is_kept() {
        let registry = registry();
        let game = registry.get_or_create("done", GameOptions::default());
        let answer = lock_game(&game).answer().to_string();
        lock_game(&game).submit_word(&answer, registry.lexicon());

        let again = registry.get_playable("done", GameOptions::default());
        assert!(Arc::ptr_eq(&game, &again));
        assert_eq!(lock_game(&again).status(), GameStatus::Won);
    }

    #[test]
    fn concurrent_guesses_on_one_session_are_serialized() {
        let registry = Arc::new(registry());
        registry.get_or_create("shared", GameOptions::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let game = registry.get_or_create("shared", GameOptions::default());
                    lock_game(&game).submit_word("adieu", registry.lexicon())
                })
            })
            .collect();

        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| outcome.success)
            .count();

        // "adieu" is never an answer here, so exactly six guesses land
        let game = registry.get_game("shared").unwrap();
        let state = lock_game(&game);
        assert_eq!(accepted, 6);
        assert_eq!(state.guesses().len(), 6);
        assert_eq!(state.feedback().len(), 6);
        assert_eq!(state.status(), GameStatus::Lost);
    }

    #[test]
    fn end_session_removes_entry() {
        let registry = registry();
        registry.get_or_create("bye", GameOptions::default());
        assert!(registry.end_session("bye"));
        assert!(registry.get_game("bye").is_none());
    }
}
