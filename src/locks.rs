//! Keyed mutual exclusion for multi-record mutations.
//!
//! The record store has no transactions, so every mutation that touches
//! more than one record runs under per-entity async mutexes. Acquisition
//! order is fixed everywhere: match lock before player locks, player locks
//! in ascending id order. Readers take no locks.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::model::{MatchId, PlayerId};

/// One async mutex per key, created on first use.
///
/// Entries are kept for the life of the table.
// TODO: evict entries whose mutex is uncontended (Arc strong count of 1)
// so long-lived processes do not grow the table per retired player/match.
pub(crate) struct KeyedLocks<K> {
    table: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K: Copy + Eq + Hash + Ord> KeyedLocks<K> {
    pub(crate) fn new() -> Self {
        Self {
            table: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, key: K) -> Arc<AsyncMutex<()>> {
        self.table.lock().entry(key).or_default().clone()
    }

    pub(crate) async fn lock(&self, key: K) -> OwnedMutexGuard<()> {
        self.entry(key).lock_owned().await
    }

    /// Lock two distinct keys, always in ascending order.
    pub(crate) async fn lock_pair(
        &self,
        a: K,
        b: K,
    ) -> (OwnedMutexGuard<()>, OwnedMutexGuard<()>) {
        debug_assert!(a != b, "lock_pair requires distinct keys");
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let first = self.lock(lo).await;
        let second = self.lock(hi).await;
        (first, second)
    }
}

/// Lock tables shared by the ledger and the engine.
pub(crate) struct LockTable {
    pub(crate) players: KeyedLocks<PlayerId>,
    pub(crate) matches: KeyedLocks<MatchId>,
}

impl LockTable {
    pub(crate) fn new() -> Self {
        Self {
            players: KeyedLocks::new(),
            matches: KeyedLocks::new(),
        }
    }
}
