//! Table layer: drives rounds with scheduled bot decisions.
//!
//! - `driver`: `Table`, one round plus its bots and observer
//! - `matchplay`: `Match`, cumulative scoring across rounds

pub mod driver;
pub mod matchplay;

pub use driver::{BotTask, FireReport, Table};
pub use matchplay::Match;
