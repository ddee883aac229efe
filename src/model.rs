//! Core domain types for the competition tracker.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Cents;

/// Player identifier, assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(u64);

/// Match identifier, assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(u64);

macro_rules! id_impls {
    ($name:ident) => {
        impl $name {
            /// Placeholder id for records not yet inserted.
            pub const UNASSIGNED: $name = $name(0);

            pub const fn new(value: u64) -> Self {
                $name(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name(s.parse()?))
            }
        }
    };
}

id_impls!(PlayerId);
id_impls!(MatchId);

/// Which hand a player favors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
    Ambi,
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handedness::Left => write!(f, "left"),
            Handedness::Right => write!(f, "right"),
            Handedness::Ambi => write!(f, "ambi"),
        }
    }
}

impl FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Handedness::Left),
            "right" => Ok(Handedness::Right),
            "ambi" => Ok(Handedness::Ambi),
            other => Err(other.to_string()),
        }
    }
}

/// Persisted player state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub first_name: String,
    pub last_name: Option<String>,
    pub handedness: Handedness,
    pub is_active: bool,
    pub balance: Cents,
    /// Matches joined over the player's lifetime.
    pub joined: u32,
    pub won: u32,
    pub disqualified: u32,
    pub total_points: u64,
    pub total_prize: Cents,
    /// The one active match currently holding this player, if any.
    pub locked_match: Option<MatchId>,
    pub created_at: DateTime<Utc>,
}

impl PlayerRecord {
    /// New unlocked, active player with zeroed counters. The id is assigned
    /// on insert.
    pub fn new(
        first_name: String,
        last_name: Option<String>,
        handedness: Handedness,
        balance: Cents,
    ) -> Self {
        Self {
            id: PlayerId::UNASSIGNED,
            first_name,
            last_name,
            handedness,
            is_active: true,
            balance,
            joined: 0,
            won: 0,
            disqualified: 0,
            total_points: 0,
            total_prize: Cents::ZERO,
            locked_match: None,
            created_at: Utc::now(),
        }
    }

    /// Display name: first name, plus the last name when present.
    pub fn display_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {}", self.first_name, last),
            None => self.first_name.clone(),
        }
    }
}

/// Persisted match state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub p1: PlayerId,
    pub p2: PlayerId,
    /// Entry fee debited from both participants at creation.
    pub entry_fee: Cents,
    /// Prize credited to the winner at settlement.
    pub prize: Cents,
    pub p1_points: u32,
    pub p2_points: u32,
    pub created_at: DateTime<Utc>,
    /// None while the match is active.
    pub ended_at: Option<DateTime<Utc>>,
    pub winner: Option<PlayerId>,
    pub disqualified: bool,
}

impl MatchRecord {
    /// New active match with zero points. The id is assigned on insert.
    pub fn new(p1: PlayerId, p2: PlayerId, entry_fee: Cents, prize: Cents) -> Self {
        Self {
            id: MatchId::UNASSIGNED,
            p1,
            p2,
            entry_fee,
            prize,
            p1_points: 0,
            p2_points: 0,
            created_at: Utc::now(),
            ended_at: None,
            winner: None,
            disqualified: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    pub fn is_participant(&self, player: PlayerId) -> bool {
        player == self.p1 || player == self.p2
    }

    /// The other participant, or None if `player` is not in this match.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if player == self.p1 {
            Some(self.p2)
        } else if player == self.p2 {
            Some(self.p1)
        } else {
            None
        }
    }

    /// Mutable point counter for the given participant.
    pub fn points_mut(&mut self, player: PlayerId) -> Option<&mut u32> {
        if player == self.p1 {
            Some(&mut self.p1_points)
        } else if player == self.p2 {
            Some(&mut self.p2_points)
        } else {
            None
        }
    }

    /// The participant with strictly more points; None on a tie.
    pub fn leader(&self) -> Option<PlayerId> {
        match self.p1_points.cmp(&self.p2_points) {
            std::cmp::Ordering::Greater => Some(self.p1),
            std::cmp::Ordering::Less => Some(self.p2),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Read-only player projection with derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub name: String,
    pub handedness: Handedness,
    pub is_active: bool,
    pub balance: Cents,
    pub joined: u32,
    pub won: u32,
    pub disqualified: u32,
    pub total_points: u64,
    pub total_prize: Cents,
    /// Wins over joins; 0.0 for a player who never joined a match.
    pub efficiency: f64,
    pub locked_match: Option<MatchId>,
}

impl From<&PlayerRecord> for PlayerView {
    fn from(record: &PlayerRecord) -> Self {
        let efficiency = if record.joined > 0 {
            f64::from(record.won) / f64::from(record.joined)
        } else {
            0.0
        };
        Self {
            id: record.id,
            name: record.display_name(),
            handedness: record.handedness,
            is_active: record.is_active,
            balance: record.balance,
            joined: record.joined,
            won: record.won,
            disqualified: record.disqualified,
            total_points: record.total_points,
            total_prize: record.total_prize,
            efficiency,
            locked_match: record.locked_match,
        }
    }
}

/// Read-only match projection with derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct MatchView {
    pub id: MatchId,
    pub p1: PlayerId,
    pub p2: PlayerId,
    pub entry_fee: Cents,
    pub prize: Cents,
    pub p1_points: u32,
    pub p2_points: u32,
    /// None while the match is active.
    pub winner: Option<PlayerId>,
    pub disqualified: bool,
    pub is_active: bool,
    /// Seconds elapsed since creation.
    pub age_secs: i64,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl MatchView {
    pub fn project(record: &MatchRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: record.id,
            p1: record.p1,
            p2: record.p2,
            entry_fee: record.entry_fee,
            prize: record.prize,
            p1_points: record.p1_points,
            p2_points: record.p2_points,
            winner: record.winner,
            disqualified: record.disqualified,
            is_active: record.is_active(),
            age_secs: (now - record.created_at).num_seconds(),
            created_at: record.created_at,
            ended_at: record.ended_at,
        }
    }
}

/// Status filter for match listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchFilter {
    Active,
    Ended,
    All,
}

/// A command representing the possible inputs of the tracker.
#[derive(Debug, Clone)]
pub enum Command {
    /// Register a new player with an opening balance.
    CreatePlayer {
        first_name: String,
        last_name: Option<String>,
        handedness: Handedness,
        balance: Cents,
    },
    /// Credit funds to a player's balance.
    Deposit { player: PlayerId, amount: Cents },
    /// Open a match between two players, escrowing the entry fee from both.
    CreateMatch {
        p1: PlayerId,
        p2: PlayerId,
        entry_fee: Cents,
        prize: Cents,
    },
    /// Add points to one participant of an active match.
    AwardPoints {
        r#match: MatchId,
        player: PlayerId,
        points: u32,
    },
    /// Settle an active, untied match in favor of the points leader.
    EndMatch { r#match: MatchId },
    /// Settle an active match against the named participant.
    Disqualify { r#match: MatchId, player: PlayerId },
}
