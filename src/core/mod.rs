//! Core engine types: players, RNG, rule configuration, intents, errors and
//! the round state.
//!
//! Everything here is plain data. Rules live in `rules`, state transitions
//! live in `round`.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{ActionRecord, Intent};
pub use config::{GameRuleConfig, WinCondition, HAND_SIZE_CAP};
pub use error::{EngineError, IllegalReason, StaleReason};
pub use player::{PlayerId, PlayerKind, PlayerMap, Roster, Seat, HUMAN_ID};
pub use rng::GameRng;
pub use state::{Phase, PlayerState, RoundState};
