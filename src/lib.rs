pub mod csv;
pub mod engine;
pub mod error;
pub mod ledger;
mod locks;
pub mod model;
pub mod money;
pub mod replay;
pub mod store;

pub use engine::MatchEngine;
pub use error::{EngineError, ValidationError};
pub use ledger::PlayerLedger;
pub use model::{Command, Handedness, MatchFilter, MatchId, PlayerId};
pub use money::Cents;
