//! In-process, per-game mutual exclusion.
//!
//! Every mutating command for a game runs while holding that game's lock, so
//! commands for one game are applied one at a time even on backends without
//! row locks. Lock order is: game lock, then transaction, then rows.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
pub struct GameLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

/// Held for the duration of one command; releases on drop.
pub type GameLockGuard = OwnedMutexGuard<()>;

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `game_id`.
    pub async fn acquire(&self, game_id: i64) -> GameLockGuard {
        let lock = {
            let entry = self
                .locks
                .entry(game_id)
                .or_insert_with(|| Arc::new(Mutex::new(())));
            Arc::clone(entry.value())
        };
        lock.lock_owned().await
    }

    /// Drops entries nobody holds or waits on.
    pub fn prune_idle(&self) {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
