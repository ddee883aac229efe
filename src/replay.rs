//! Replays a command stream through the ledger and the engine.
//!
//! A season file is a linear history; one bad command must not sink the
//! rest of it. Failures are logged with their reason and skipped.

use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::engine::MatchEngine;
use crate::error::EngineError;
use crate::ledger::PlayerLedger;
use crate::model::Command;

/// Apply every command from the stream in order.
pub async fn replay(
    ledger: &PlayerLedger,
    engine: &MatchEngine,
    mut stream: impl Stream<Item = Command> + Unpin,
) {
    while let Some(command) = stream.next().await {
        // the replay result is already logged, keep going either way
        let _ = apply(ledger, engine, command).await;
    }
}

/// Apply a single command, logging whether it was applied or skipped.
pub async fn apply(
    ledger: &PlayerLedger,
    engine: &MatchEngine,
    command: Command,
) -> Result<(), EngineError> {
    let label = label(&command);
    let result = dispatch(ledger, engine, command).await;
    match &result {
        Ok(()) => info!("{label} applied"),
        Err(e) => info!(reason = %e, "{label} skipped"),
    }
    result
}

async fn dispatch(
    ledger: &PlayerLedger,
    engine: &MatchEngine,
    command: Command,
) -> Result<(), EngineError> {
    match command {
        Command::CreatePlayer {
            first_name,
            last_name,
            handedness,
            balance,
        } => ledger
            .create_player(&first_name, last_name.as_deref(), handedness, balance)
            .await
            .map(drop),
        Command::Deposit { player, amount } => ledger.deposit(player, amount).await.map(drop),
        Command::CreateMatch {
            p1,
            p2,
            entry_fee,
            prize,
        } => engine.create_match(p1, p2, entry_fee, prize).await.map(drop),
        Command::AwardPoints {
            r#match,
            player,
            points,
        } => engine.award_points(r#match, player, points).await,
        Command::EndMatch { r#match } => engine.end_match(r#match).await,
        Command::Disqualify { r#match, player } => engine.disqualify(r#match, player).await,
    }
}

fn label(command: &Command) -> &'static str {
    match command {
        Command::CreatePlayer { .. } => "create player",
        Command::Deposit { .. } => "deposit",
        Command::CreateMatch { .. } => "create match",
        Command::AwardPoints { .. } => "award points",
        Command::EndMatch { .. } => "end match",
        Command::Disqualify { .. } => "disqualify",
    }
}
