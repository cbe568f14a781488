//! Scoring engine: rate escalation during play and settlement at round end.

pub mod rate;
pub mod settlement;

pub use rate::RateTracker;
pub use settlement::{settle, standings, Outcome, ScoreResult, SettlementInput};
