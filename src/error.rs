//! Error types shared by the player ledger and the match engine.

use thiserror::Error;

use crate::Cents;
use crate::model::{MatchId, PlayerId};
use crate::store::StoreError;

/// Top-level error returned by ledger and engine operations.
///
/// Every operation either succeeds or fails with exactly one of these;
/// callers match exhaustively and map each kind to their own transport.
/// [`EngineError::Store`] is the only infrastructure variant, so retry
/// policy can be decided without string inspection.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("match {0} not found")]
    MatchNotFound(MatchId),

    #[error("player {0} is already in active match {1}")]
    AlreadyLocked(PlayerId, MatchId),

    #[error("insufficient funds for player {0}: balance {1}, required {2}")]
    InsufficientFunds(PlayerId, Cents, Cents),

    #[error("match {0} is not active")]
    MatchNotActive(MatchId),

    #[error("player {0} is not a participant of match {1}")]
    InvalidParticipant(PlayerId, MatchId),

    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("storage failure: {0}")]
    Store(#[from] StoreError),
}

/// Malformed input rejected at the operation boundary.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} must be non-empty and alphabetic, got {value:?}")]
    Name { field: &'static str, value: String },

    #[error("unknown handedness {0:?}")]
    Handedness(String),

    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Cents),

    #[error("deposit amount must be positive, got {0}")]
    NonPositiveDeposit(Cents),

    #[error("points must be positive")]
    ZeroPoints,

    #[error("a match needs two distinct players, got {0} twice")]
    SamePlayer(PlayerId),
}
