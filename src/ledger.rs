//! Player ledger.
//!
//! Owns player identity, balances and lifetime counters. Match bookkeeping
//! (escrow, payout, locking) is driven by the engine, which shares this
//! ledger's store and lock table.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::Cents;
use crate::error::{EngineError, ValidationError};
use crate::locks::LockTable;
use crate::model::{Handedness, PlayerId, PlayerRecord, PlayerView};
use crate::store::Store;

/// Partial player update; omitted fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct PlayerUpdate {
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

/// Balance before and after a deposit or adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BalanceChange {
    pub old_balance: Cents,
    pub new_balance: Cents,
}

/// Aggregate counts over the whole player book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total_players: u64,
    pub active_players: u64,
    pub inactive_players: u64,
    /// Mean balance in cents, rounded toward zero. Zero when empty.
    pub average_balance: Cents,
}

/// Player book over a shared record store.
#[derive(Clone)]
pub struct PlayerLedger {
    pub(crate) store: Arc<dyn Store>,
    pub(crate) locks: Arc<LockTable>,
}

impl PlayerLedger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: Arc::new(LockTable::new()),
        }
    }

    /// Register a new player. Starts unlocked and active with zeroed
    /// counters.
    pub async fn create_player(
        &self,
        first_name: &str,
        last_name: Option<&str>,
        handedness: Handedness,
        initial_balance: Cents,
    ) -> Result<PlayerId, EngineError> {
        validate_name("first_name", first_name)?;
        if let Some(last) = last_name {
            validate_name("last_name", last)?;
        }
        if initial_balance.is_negative() {
            return Err(ValidationError::NegativeAmount(initial_balance).into());
        }

        let record = PlayerRecord::new(
            first_name.to_string(),
            last_name.map(str::to_string),
            handedness,
            initial_balance,
        );
        let id = self.store.insert_player(record).await?;
        info!(player = %id, name = first_name, balance = %initial_balance, "player created");
        Ok(id)
    }

    pub async fn player(&self, id: PlayerId) -> Result<PlayerView, EngineError> {
        Ok(PlayerView::from(&self.load(id).await?))
    }

    /// All players ordered by display name, case-insensitive, ties in
    /// storage order. `active` narrows to active (true) or inactive (false)
    /// players; None lists everyone.
    pub async fn players(&self, active: Option<bool>) -> Result<Vec<PlayerView>, EngineError> {
        let records = self.store.list_players().await?;
        let views = records
            .iter()
            .filter(|r| active.is_none_or(|want| r.is_active == want))
            .map(PlayerView::from)
            .collect();
        Ok(sort_by_name(views))
    }

    /// Exact-match search on first and/or last name. No criteria means no
    /// results.
    pub async fn find_players_by_name(
        &self,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<Vec<PlayerView>, EngineError> {
        if first_name.is_none() && last_name.is_none() {
            return Ok(Vec::new());
        }
        let records = self.store.list_players().await?;
        let views = records
            .iter()
            .filter(|r| {
                first_name.is_none_or(|f| r.first_name == f)
                    && last_name.is_none_or(|l| r.last_name.as_deref() == Some(l))
            })
            .map(PlayerView::from)
            .collect();
        Ok(sort_by_name(views))
    }

    /// Apply a partial update and return the updated view.
    pub async fn update_player(
        &self,
        id: PlayerId,
        update: PlayerUpdate,
    ) -> Result<PlayerView, EngineError> {
        if let Some(last) = update.last_name.as_deref() {
            validate_name("last_name", last)?;
        }

        let _guard = self.locks.players.lock(id).await;
        let mut record = self.load(id).await?;
        if let Some(last) = update.last_name {
            record.last_name = Some(last);
        }
        if let Some(is_active) = update.is_active {
            record.is_active = is_active;
        }
        self.save(&record).await?;
        Ok(PlayerView::from(&record))
    }

    /// Hard delete. A player locked into an active match cannot be deleted;
    /// settle or disqualify the match first.
    pub async fn delete_player(&self, id: PlayerId) -> Result<(), EngineError> {
        let _guard = self.locks.players.lock(id).await;
        let record = self.load(id).await?;
        if let Some(mid) = record.locked_match {
            warn!(player = %id, match_id = %mid, "refusing to delete player in active match");
            return Err(EngineError::AlreadyLocked(id, mid));
        }
        self.store.delete_player(id).await?;
        info!(player = %id, "player deleted");
        Ok(())
    }

    /// Credit a strictly positive amount to the player's balance.
    pub async fn deposit(&self, id: PlayerId, amount: Cents) -> Result<BalanceChange, EngineError> {
        if amount <= Cents::ZERO {
            return Err(ValidationError::NonPositiveDeposit(amount).into());
        }
        let change = self.adjust_balance(id, amount).await?;
        info!(player = %id, amount = %amount, balance = %change.new_balance, "deposit applied");
        Ok(change)
    }

    /// Apply a signed balance delta. No floor is enforced here; the escrow
    /// check in match creation is the only debit path and verifies funds
    /// first.
    pub async fn adjust_balance(
        &self,
        id: PlayerId,
        delta: Cents,
    ) -> Result<BalanceChange, EngineError> {
        let _guard = self.locks.players.lock(id).await;
        let mut record = self.load(id).await?;
        let old_balance = record.balance;
        record.balance += delta;
        self.save(&record).await?;
        Ok(BalanceChange {
            old_balance,
            new_balance: record.balance,
        })
    }

    /// Aggregate counts over all players.
    pub async fn stats(&self) -> Result<LedgerStats, EngineError> {
        let records = self.store.list_players().await?;
        let total = records.len() as u64;
        let active = records.iter().filter(|r| r.is_active).count() as u64;
        let average = if records.is_empty() {
            Cents::ZERO
        } else {
            let sum: i64 = records.iter().map(|r| r.balance.get()).sum();
            Cents::new(sum / records.len() as i64)
        };
        Ok(LedgerStats {
            total_players: total,
            active_players: active,
            inactive_players: total - active,
            average_balance: average,
        })
    }

    /// Fetch a record, mapping absence to [`EngineError::PlayerNotFound`].
    pub(crate) async fn load(&self, id: PlayerId) -> Result<PlayerRecord, EngineError> {
        self.store
            .get_player(id)
            .await?
            .ok_or(EngineError::PlayerNotFound(id))
    }

    pub(crate) async fn save(&self, record: &PlayerRecord) -> Result<(), EngineError> {
        if !self.store.put_player(record).await? {
            return Err(EngineError::PlayerNotFound(record.id));
        }
        Ok(())
    }
}

fn validate_name(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::Name {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

fn sort_by_name(mut views: Vec<PlayerView>) -> Vec<PlayerView> {
    // Stable sort, so equal names keep storage order.
    views.sort_by_key(|v| v.name.to_lowercase());
    views
}
