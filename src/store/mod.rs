//! Record store contract.
//!
//! Ledger and engine reach all persistent state through [`Store`]; the
//! store owns id assignment and nothing else. Domain rules live above it.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{MatchId, MatchRecord, PlayerId, PlayerRecord};

mod memory;
pub use memory::MemoryStore;

/// Infrastructure fault from the backing store. Distinct from domain
/// errors so callers can decide whether to retry.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {reason}")]
    Unavailable {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("corrupt record: {reason}")]
    Corrupt { reason: String },
}

/// Persistent player/match record store.
///
/// Every call is a fresh acquire-use-release round trip; the store keeps
/// no per-caller session state. Writes replace whole records keyed by id.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a new player, assigning its id. Returns the assigned id.
    async fn insert_player(&self, record: PlayerRecord) -> Result<PlayerId, StoreError>;

    async fn get_player(&self, id: PlayerId) -> Result<Option<PlayerRecord>, StoreError>;

    /// All players in storage order (ascending id).
    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StoreError>;

    /// Replace the record with the same id. Returns false if it does not exist.
    async fn put_player(&self, record: &PlayerRecord) -> Result<bool, StoreError>;

    /// Hard delete. Returns false if the player does not exist.
    async fn delete_player(&self, id: PlayerId) -> Result<bool, StoreError>;

    /// Insert a new match, assigning its id. Returns the assigned id.
    async fn insert_match(&self, record: MatchRecord) -> Result<MatchId, StoreError>;

    async fn get_match(&self, id: MatchId) -> Result<Option<MatchRecord>, StoreError>;

    /// All matches in storage order (ascending id).
    async fn list_matches(&self) -> Result<Vec<MatchRecord>, StoreError>;

    /// Replace the record with the same id. Returns false if it does not exist.
    async fn put_match(&self, record: &MatchRecord) -> Result<bool, StoreError>;
}
