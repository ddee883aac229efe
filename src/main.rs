use std::env;
use std::sync::Arc;

use tokio_stream::wrappers::ReceiverStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use arena_eng::csv::{read_commands, write_standings};
use arena_eng::store::MemoryStore;
use arena_eng::{MatchEngine, PlayerLedger, replay};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let path = env::args().nth(1).expect("usage: arena-eng <season.csv>");

    if !path.ends_with(".csv") {
        warn!(path, "input file seems to not be a csv file");
    }

    let ledger = PlayerLedger::new(Arc::new(MemoryStore::new()));
    let engine = MatchEngine::new(&ledger);

    let (cmd_sender, cmd_receiver) = tokio::sync::mpsc::channel(16);

    tokio::spawn(async move {
        for result in read_commands(&path) {
            match result {
                Ok(command) => {
                    cmd_sender.send(command).await.unwrap();
                }
                Err(e) => {
                    warn!("{e}");
                }
            }
        }
    });

    replay::replay(&ledger, &engine, ReceiverStream::new(cmd_receiver)).await;

    let standings = ledger.players(None).await.expect("failed to list players");
    write_standings(standings);
}
