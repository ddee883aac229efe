//! Match lifecycle engine.
//!
//! Creates matches with entry-fee escrow, awards points while play is on,
//! and settles through a normal end or a disqualification. A match is
//! Active from creation until settlement and Ended forever after; no
//! operation leaves Ended.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::Cents;
use crate::error::{EngineError, ValidationError};
use crate::ledger::PlayerLedger;
use crate::locks::LockTable;
use crate::model::{MatchFilter, MatchId, MatchRecord, MatchView, PlayerId};
use crate::store::Store;

/// Match lifecycle over the ledger's store.
///
/// Built from a [`PlayerLedger`] so escrow and settlement mutate player
/// records under the same lock table the ledger uses.
#[derive(Clone)]
pub struct MatchEngine {
    ledger: PlayerLedger,
}

impl MatchEngine {
    pub fn new(ledger: &PlayerLedger) -> Self {
        Self {
            ledger: ledger.clone(),
        }
    }

    fn store(&self) -> &Arc<dyn Store> {
        &self.ledger.store
    }

    fn locks(&self) -> &LockTable {
        &self.ledger.locks
    }

    /// Open a match between two distinct players.
    ///
    /// Checks run in a fixed order: both players must exist, be unlocked,
    /// and hold at least the entry fee. On success the fee is debited from
    /// both, their joined counters bump, and both are locked to the new
    /// match. Each player is written once, so no schedule can observe a
    /// player debited but not locked.
    pub async fn create_match(
        &self,
        p1: PlayerId,
        p2: PlayerId,
        entry_fee: Cents,
        prize: Cents,
    ) -> Result<MatchId, EngineError> {
        if p1 == p2 {
            return Err(ValidationError::SamePlayer(p1).into());
        }
        if entry_fee.is_negative() {
            return Err(ValidationError::NegativeAmount(entry_fee).into());
        }
        if prize.is_negative() {
            return Err(ValidationError::NegativeAmount(prize).into());
        }

        let _guards = self.locks().players.lock_pair(p1, p2).await;
        let mut first = self.ledger.load(p1).await?;
        let mut second = self.ledger.load(p2).await?;

        for record in [&first, &second] {
            if let Some(mid) = record.locked_match {
                return Err(EngineError::AlreadyLocked(record.id, mid));
            }
        }
        for record in [&first, &second] {
            if record.balance < entry_fee {
                return Err(EngineError::InsufficientFunds(
                    record.id,
                    record.balance,
                    entry_fee,
                ));
            }
        }

        let id = self
            .store()
            .insert_match(MatchRecord::new(p1, p2, entry_fee, prize))
            .await?;

        for record in [&mut first, &mut second] {
            record.balance -= entry_fee;
            record.joined += 1;
            record.locked_match = Some(id);
            self.ledger.save(record).await?;
        }

        info!(
            match_id = %id,
            p1 = %p1,
            p2 = %p2,
            entry_fee = %entry_fee,
            prize = %prize,
            "match created"
        );
        Ok(id)
    }

    /// Add points to one participant of an active match. Also bumps the
    /// player's lifetime points total.
    pub async fn award_points(
        &self,
        id: MatchId,
        player: PlayerId,
        points: u32,
    ) -> Result<(), EngineError> {
        if points == 0 {
            return Err(ValidationError::ZeroPoints.into());
        }

        let _match_guard = self.locks().matches.lock(id).await;
        let _player_guard = self.locks().players.lock(player).await;

        let mut record = self.load_match(id).await?;
        let mut participant = self.ledger.load(player).await?;
        if !record.is_active() {
            return Err(EngineError::MatchNotActive(id));
        }
        let Some(counter) = record.points_mut(player) else {
            return Err(EngineError::InvalidParticipant(player, id));
        };
        *counter += points;
        self.save_match(&record).await?;

        participant.total_points += u64::from(points);
        self.ledger.save(&participant).await?;

        info!(match_id = %id, player = %player, points, "points awarded");
        Ok(())
    }

    /// Settle an active match in favor of the points leader.
    ///
    /// A tied match cannot be ended; it stays active until the tie breaks
    /// or a participant is disqualified.
    pub async fn end_match(&self, id: MatchId) -> Result<(), EngineError> {
        let _match_guard = self.locks().matches.lock(id).await;
        let mut record = self.load_match(id).await?;
        if !record.is_active() {
            return Err(EngineError::MatchNotActive(id));
        }
        let Some(winner) = record.leader() else {
            return Err(EngineError::MatchNotActive(id));
        };

        let _player_guards = self.locks().players.lock_pair(record.p1, record.p2).await;
        self.settle(&mut record, winner, false).await?;

        info!(match_id = %id, winner = %winner, prize = %record.prize, "match ended");
        Ok(())
    }

    /// Settle an active match against `player`: the other participant wins
    /// regardless of points, and the offender's disqualification counter
    /// bumps.
    pub async fn disqualify(&self, id: MatchId, player: PlayerId) -> Result<(), EngineError> {
        let _match_guard = self.locks().matches.lock(id).await;
        let mut record = self.load_match(id).await?;
        self.ledger.load(player).await?;
        if !record.is_active() {
            return Err(EngineError::MatchNotActive(id));
        }
        let Some(winner) = record.opponent_of(player) else {
            return Err(EngineError::InvalidParticipant(player, id));
        };

        let _player_guards = self.locks().players.lock_pair(record.p1, record.p2).await;
        self.settle(&mut record, winner, true).await?;

        info!(match_id = %id, winner = %winner, disqualified = %player, "match settled by disqualification");
        Ok(())
    }

    pub async fn match_view(&self, id: MatchId) -> Result<MatchView, EngineError> {
        let record = self.load_match(id).await?;
        Ok(MatchView::project(&record, Utc::now()))
    }

    /// Matches under the given filter. Active matches order by prize
    /// descending; ended matches by end time, most recent first. With
    /// [`MatchFilter::All`] the active group precedes the ended group and
    /// each keeps its own ordering.
    pub async fn matches(&self, filter: MatchFilter) -> Result<Vec<MatchView>, EngineError> {
        let records = self.store().list_matches().await?;
        let now = Utc::now();

        let mut active: Vec<&MatchRecord> = records.iter().filter(|m| m.is_active()).collect();
        let mut ended: Vec<&MatchRecord> = records.iter().filter(|m| !m.is_active()).collect();
        active.sort_by(|a, b| b.prize.cmp(&a.prize));
        ended.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));

        let selected = match filter {
            MatchFilter::Active => active,
            MatchFilter::Ended => ended,
            MatchFilter::All => {
                active.extend(ended);
                active
            }
        };
        Ok(selected
            .into_iter()
            .map(|m| MatchView::project(m, now))
            .collect())
    }

    /// Write the terminal state and release both players. The caller holds
    /// the match lock and both player locks.
    async fn settle(
        &self,
        record: &mut MatchRecord,
        winner: PlayerId,
        disqualification: bool,
    ) -> Result<(), EngineError> {
        let loser = record
            .opponent_of(winner)
            .ok_or(EngineError::InvalidParticipant(winner, record.id))?;
        let mut winner_record = self.ledger.load(winner).await?;
        let mut loser_record = self.ledger.load(loser).await?;

        record.ended_at = Some(Utc::now());
        record.winner = Some(winner);
        record.disqualified = disqualification;
        self.save_match(record).await?;

        loser_record.locked_match = None;
        if disqualification {
            loser_record.disqualified += 1;
        }
        self.ledger.save(&loser_record).await?;

        winner_record.locked_match = None;
        winner_record.won += 1;
        winner_record.balance += record.prize;
        winner_record.total_prize += record.prize;
        self.ledger.save(&winner_record).await?;

        Ok(())
    }

    async fn load_match(&self, id: MatchId) -> Result<MatchRecord, EngineError> {
        self.store()
            .get_match(id)
            .await?
            .ok_or(EngineError::MatchNotFound(id))
    }

    async fn save_match(&self, record: &MatchRecord) -> Result<(), EngineError> {
        if !self.store().put_match(record).await? {
            return Err(EngineError::MatchNotFound(record.id));
        }
        Ok(())
    }
}
