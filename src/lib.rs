//! # dotenko
//!
//! Rules and decision engine for Dotenko, a shedding card game played with a
//! standard deck plus jokers. Players match the field card by suit or value,
//! and call "dotenko" when their whole hand sums to the card just played.
//!
//! ## Design Principles
//!
//! 1. **One owner**: a round's state is owned by its `Round` and changes only
//!    through `Round::submit_intent`. Everything else reads snapshots.
//!
//! 2. **Pure rules**: legality and scoring are plain functions over cards and
//!    configuration, reachable through the `RuleOracle` trait.
//!
//! 3. **Scheduled bots**: bot thinking time is a due time on a virtual clock,
//!    never a sleep. Every fired decision is re-validated before it applies.
//!
//! 4. **Replayable**: a seed fixes the deal, the reshuffles and the bot
//!    delays.
//!
//! ## Modules
//!
//! - `core`: players, RNG, rule configuration, intents, errors, round state
//! - `cards`: cards, hand values, hands, deck and field stack
//! - `rules`: legality engine
//! - `scoring`: rate escalation and settlement
//! - `round`: round state machine and its events
//! - `bot`: bot decision policy and reaction timing
//! - `schedule`: virtual-clock scheduler with cancellation
//! - `table`: table driver and multi-round matches

pub mod bot;
pub mod cards;
pub mod core;
pub mod round;
pub mod rules;
pub mod schedule;
pub mod scoring;
pub mod table;

// Re-export commonly used types
pub use crate::core::{
    ActionRecord, EngineError, GameRng, GameRuleConfig, IllegalReason, Intent, Phase,
    PlayerId, PlayerKind, PlayerMap, PlayerState, Roster, RoundState, Seat, StaleReason, WinCondition,
    HUMAN_ID,
};

pub use crate::cards::{Card, CardSet, Deck, FieldStack, Hand, JokerColor, Rank, Suit, ValueTable};

pub use crate::rules::{DeclareContext, Referee, RuleOracle};

pub use crate::scoring::{settle, standings, Outcome, RateTracker, ScoreResult, SettlementInput};

pub use crate::round::{Applied, EventLog, Round, RoundEvent, RoundLayout, RoundObserver};

pub use crate::bot::{decide, scan_declarations, BotAction, BotTiming, BotView, DecisionKind};

pub use crate::schedule::{CancelToken, Scheduled, Scheduler, TaskId};

pub use crate::table::{BotTask, FireReport, Match, Table};
