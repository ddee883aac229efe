use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Cents;
use crate::error::ValidationError;
use crate::model::{Command, MatchId, PlayerId, PlayerView};

/// Errors that can occur when parsing season csv rows
#[derive(Debug, Error)]
pub enum CsvError {
    #[error("line {line}: failed to parse row: {source}")]
    Parse { line: usize, source: csv::Error },

    #[error("line {line}: unrecognized op '{op}'")]
    UnrecognizedOp { line: usize, op: String },

    #[error("line {line}: {op} missing {field}")]
    MissingField {
        line: usize,
        op: String,
        field: &'static str,
    },

    #[error("line {line}: {source}")]
    Invalid {
        line: usize,
        source: ValidationError,
    },
}

#[derive(Debug, Deserialize)]
struct InputRow {
    op: String,
    fname: Option<String>,
    lname: Option<String>,
    handed: Option<String>,
    p1: Option<u64>,
    p2: Option<u64>,
    mid: Option<u64>,
    amount: Option<i64>,
    prize: Option<i64>,
    points: Option<u32>,
}

#[derive(Debug, Serialize)]
struct OutputRow {
    player: u64,
    name: String,
    handed: String,
    balance: String,
    joined: u32,
    won: u32,
    dq: u32,
    points: u64,
    prize: String,
    in_match: String,
}

/// Read season commands from a csv file
pub fn read_commands(path: impl AsRef<Path>) -> impl Iterator<Item = Result<Command, CsvError>> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .expect("failed to open csv file");

    reader
        .into_deserialize::<InputRow>()
        .enumerate()
        .map(|(idx, result)| {
            let line = idx + 2; // 1-indexed, skip header
            let row = result.map_err(|source| CsvError::Parse { line, source })?;
            row_to_command(line, row)
        })
}

fn row_to_command(line: usize, row: InputRow) -> Result<Command, CsvError> {
    fn require<T>(
        value: Option<T>,
        line: usize,
        op: &str,
        field: &'static str,
    ) -> Result<T, CsvError> {
        value.ok_or(CsvError::MissingField {
            line,
            op: op.to_string(),
            field,
        })
    }

    match row.op.as_str() {
        "player" => {
            let first_name = require(row.fname, line, "player", "fname")?;
            let handed = require(row.handed, line, "player", "handed")?;
            let handedness = handed
                .parse()
                .map_err(|value| CsvError::Invalid {
                    line,
                    source: ValidationError::Handedness(value),
                })?;
            let amount = require(row.amount, line, "player", "amount")?;
            Ok(Command::CreatePlayer {
                first_name,
                last_name: row.lname,
                handedness,
                balance: Cents::new(amount),
            })
        }
        "deposit" => Ok(Command::Deposit {
            player: PlayerId::new(require(row.p1, line, "deposit", "p1")?),
            amount: Cents::new(require(row.amount, line, "deposit", "amount")?),
        }),
        "match" => Ok(Command::CreateMatch {
            p1: PlayerId::new(require(row.p1, line, "match", "p1")?),
            p2: PlayerId::new(require(row.p2, line, "match", "p2")?),
            entry_fee: Cents::new(require(row.amount, line, "match", "amount")?),
            prize: Cents::new(require(row.prize, line, "match", "prize")?),
        }),
        "award" => Ok(Command::AwardPoints {
            r#match: MatchId::new(require(row.mid, line, "award", "mid")?),
            player: PlayerId::new(require(row.p1, line, "award", "p1")?),
            points: require(row.points, line, "award", "points")?,
        }),
        "end" => Ok(Command::EndMatch {
            r#match: MatchId::new(require(row.mid, line, "end", "mid")?),
        }),
        "dq" => Ok(Command::Disqualify {
            r#match: MatchId::new(require(row.mid, line, "dq", "mid")?),
            player: PlayerId::new(require(row.p1, line, "dq", "p1")?),
        }),
        other => Err(CsvError::UnrecognizedOp {
            line,
            op: other.to_string(),
        }),
    }
}

/// write final player standings to stdout in csv format
pub fn write_standings(players: impl IntoIterator<Item = PlayerView>) {
    let stdout = io::stdout();
    let mut writer = csv::Writer::from_writer(stdout.lock());

    for view in players {
        let row = OutputRow {
            player: view.id.get(),
            name: view.name,
            handed: view.handedness.to_string(),
            balance: view.balance.to_string(),
            joined: view.joined,
            won: view.won,
            dq: view.disqualified,
            points: view.total_points,
            prize: view.total_prize.to_string(),
            in_match: view
                .locked_match
                .map(|m| m.to_string())
                .unwrap_or_default(),
        };
        writer.serialize(&row).expect("failed to write csv row");
    }

    writer.flush().expect("failed to flush csv writer");
}
