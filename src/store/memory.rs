//! In-memory [`Store`] backed by ordered maps.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{Store, StoreError};
use crate::model::{MatchId, MatchRecord, PlayerId, PlayerRecord};

/// In-memory record store with auto-increment id assignment.
///
/// Storage order is ascending id, which for this store equals insertion
/// order. Infallible by construction; the `Result` surface is the trait's.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_player_id: u64,
    next_match_id: u64,
    players: BTreeMap<PlayerId, PlayerRecord>,
    matches: BTreeMap<MatchId, MatchRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_player(&self, mut record: PlayerRecord) -> Result<PlayerId, StoreError> {
        let mut inner = self.inner.lock();
        inner.next_player_id += 1;
        let id = PlayerId::new(inner.next_player_id);
        record.id = id;
        inner.players.insert(id, record);
        Ok(id)
    }

    async fn get_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError> {
        Ok(self.inner.lock().players.get(&id).cloned())
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StoreError> {
        Ok(self.inner.lock().players.values().cloned().collect())
    }

    async fn put_player(&self, record: &PlayerRecord) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        match inner.players.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_player(&self, id: PlayerId) -> Result<bool, StoreError> {
        Ok(self.inner.lock().players.remove(&id).is_some())
    }

    async fn insert_match(&self, mut record: MatchRecord) -> Result<MatchId, StoreError> {
        let mut inner = self.inner.lock();
        inner.next_match_id += 1;
        let id = MatchId::new(inner.next_match_id);
        record.id = id;
        inner.matches.insert(id, record);
        Ok(id)
    }

    async fn get_match(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError> {
        Ok(self.inner.lock().matches.get(&id).cloned())
    }

    async fn list_matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        Ok(self.inner.lock().matches.values().cloned().collect())
    }

    async fn put_match(&self, record: &MatchRecord) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock();
        match inner.matches.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cents;
    use crate::model::Handedness;

    fn player(first: &str) -> PlayerRecord {
        PlayerRecord::new(first.to_string(), None, Handedness::Right, Cents::new(100))
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert_player(player("Ada")).await.unwrap();
        let b = store.insert_player(player("Bob")).await.unwrap();
        assert_eq!(a, PlayerId::new(1));
        assert_eq!(b, PlayerId::new(2));
    }

    #[tokio::test]
    async fn get_returns_inserted_record_with_id_set() {
        let store = MemoryStore::new();
        let id = store.insert_player(player("Ada")).await.unwrap();
        let fetched = store.get_player(id).await.unwrap().unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.first_name, "Ada");
    }

    #[tokio::test]
    async fn get_missing_player_is_none() {
        let store = MemoryStore::new();
        assert!(store.get_player(PlayerId::new(7)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_players_keeps_insertion_order() {
        let store = MemoryStore::new();
        store.insert_player(player("Zoe")).await.unwrap();
        store.insert_player(player("Ada")).await.unwrap();
        let names: Vec<_> = store
            .list_players()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.first_name)
            .collect();
        assert_eq!(names, ["Zoe", "Ada"]);
    }

    #[tokio::test]
    async fn put_replaces_existing_record() {
        let store = MemoryStore::new();
        let id = store.insert_player(player("Ada")).await.unwrap();
        let mut record = store.get_player(id).await.unwrap().unwrap();
        record.balance = Cents::new(999);
        assert!(store.put_player(&record).await.unwrap());
        let fetched = store.get_player(id).await.unwrap().unwrap();
        assert_eq!(fetched.balance, Cents::new(999));
    }

    #[tokio::test]
    async fn put_missing_record_returns_false() {
        let store = MemoryStore::new();
        let mut record = player("Ghost");
        record.id = PlayerId::new(41);
        assert!(!store.put_player(&record).await.unwrap());
    }

    #[tokio::test]
    async fn delete_removes_player() {
        let store = MemoryStore::new();
        let id = store.insert_player(player("Ada")).await.unwrap();
        assert!(store.delete_player(id).await.unwrap());
        assert!(!store.delete_player(id).await.unwrap());
        assert!(store.get_player(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn match_ids_are_independent_of_player_ids() {
        let store = MemoryStore::new();
        store.insert_player(player("Ada")).await.unwrap();
        let mid = store
            .insert_match(MatchRecord::new(
                PlayerId::new(1),
                PlayerId::new(2),
                Cents::ZERO,
                Cents::ZERO,
            ))
            .await
            .unwrap();
        assert_eq!(mid, MatchId::new(1));
    }
}
