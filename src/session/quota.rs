//! Limits on how many agent games a client may start
//!
//! Counting and storage are a collaborator concern; the registry only asks
//! before creating a game on behalf of a tool call.

use rustc_hash::FxHashMap;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Refusal to start another game
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("client {client} has used all {limit} games")]
pub struct QuotaExceeded {
    pub client: String,
    pub limit: usize,
}

/// Decides whether a client may start another game
pub trait GameQuota: Send + Sync {
    /// Record one new game for `client`, or refuse it
    ///
    /// # Errors
    ///
    /// Returns [`QuotaExceeded`] once the client has no games left.
    fn try_acquire(&self, client: &str) -> Result<(), QuotaExceeded>;
}

/// No limit
#[derive(Debug, Default, Clone, Copy)]
pub struct Unlimited;

impl GameQuota for Unlimited {
    fn try_acquire(&self, _client: &str) -> Result<(), QuotaExceeded> {
        Ok(())
    }
}

/// Fixed number of games per client, counted in memory
#[derive(Debug)]
pub struct PerClientQuota {
    max_games: usize,
    used: Mutex<FxHashMap<String, usize>>,
}

impl PerClientQuota {
    #[must_use]
    pub fn new(max_games: usize) -> Self {
        Self {
            max_games,
            used: Mutex::new(FxHashMap::default()),
        }
    }

    /// Games `client` has started so far
    #[must_use]
    pub fn used(&self, client: &str) -> usize {
        let used = self.used.lock().unwrap_or_else(PoisonError::into_inner);
        used.get(client).copied().unwrap_or(0)
    }
}

impl GameQuota for PerClientQuota {
    fn try_acquire(&self, client: &str) -> Result<(), QuotaExceeded> {
        let mut used = self.used.lock().unwrap_or_else(PoisonError::into_inner);
        let count = used.entry(client.to_string()).or_insert(0);
        if *count >= self.max_games {
            return Err(QuotaExceeded {
                client: client.to_string(),
                limit: self.max_games,
            });
        }
        *count += 1;
        Ok(())
    }
}
