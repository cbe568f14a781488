//! Round rule configuration.
//!
//! The outer layer supplies a `GameRuleConfig` per match. It is immutable for
//! the lifetime of a round and validated once against the seat count before
//! the first deal.

use serde::{Deserialize, Serialize};

use super::error::EngineError;
use crate::cards::{Rank, ValueTable};

/// Hard upper bound on hand size.
pub const HAND_SIZE_CAP: usize = 7;

/// Cards in a deck before jokers.
const RANKED_CARDS: usize = 52;

/// The numeric condition a hand must satisfy to declare dotenko.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinCondition {
    /// Some assignment of hand values sums to a value of the field top.
    #[default]
    MatchFieldValue,
    /// Some assignment of hand values sums to a positive multiple of ten.
    MultipleOfTen,
}

/// Rules for one match.
///
/// ```
/// use dotenko::core::{GameRuleConfig, WinCondition};
///
/// let config = GameRuleConfig::default()
///     .with_jokers(0)
///     .with_max_score(500)
///     .with_win_condition(WinCondition::MultipleOfTen);
/// assert!(config.validate(4).is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRuleConfig {
    /// Rounds in a match.
    pub round_count: u32,

    pub joker_count: u8,

    /// Points per face value before multipliers.
    pub base_rate: u64,

    /// Consecutive same-rank plays needed for each rate escalation.
    pub up_rate_threshold: u32,

    /// Factor applied to the multiplier on each escalation.
    pub rate_step: u64,

    /// Cap on one round's transfer. `None` is unlimited.
    pub max_score: Option<u64>,

    /// Reshuffles allowed per round. `None` is unlimited.
    pub deck_cycle_limit: Option<u32>,

    pub initial_hand_size: usize,

    /// Hand size that forces a burst when no play is legal.
    pub max_hand_size: usize,

    pub win_condition: WinCondition,

    pub values: ValueTable,
}

impl Default for GameRuleConfig {
    fn default() -> Self {
        Self {
            round_count: 10,
            joker_count: 2,
            base_rate: 1,
            up_rate_threshold: 3,
            rate_step: 2,
            max_score: None,
            deck_cycle_limit: Some(1),
            initial_hand_size: 2,
            max_hand_size: HAND_SIZE_CAP,
            win_condition: WinCondition::MatchFieldValue,
            values: ValueTable::default(),
        }
    }
}

impl GameRuleConfig {
    #[must_use]
    pub fn with_round_count(mut self, rounds: u32) -> Self {
        self.round_count = rounds;
        self
    }

    #[must_use]
    pub fn with_jokers(mut self, count: u8) -> Self {
        self.joker_count = count;
        self
    }

    #[must_use]
    pub fn with_base_rate(mut self, rate: u64) -> Self {
        self.base_rate = rate;
        self
    }

    #[must_use]
    pub fn with_up_rate_threshold(mut self, threshold: u32) -> Self {
        self.up_rate_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_rate_step(mut self, step: u64) -> Self {
        self.rate_step = step;
        self
    }

    #[must_use]
    pub fn with_max_score(mut self, cap: u64) -> Self {
        self.max_score = Some(cap);
        self
    }

    #[must_use]
    pub fn unlimited_score(mut self) -> Self {
        self.max_score = None;
        self
    }

    #[must_use]
    pub fn with_deck_cycle_limit(mut self, limit: u32) -> Self {
        self.deck_cycle_limit = Some(limit);
        self
    }

    #[must_use]
    pub fn unlimited_cycles(mut self) -> Self {
        self.deck_cycle_limit = None;
        self
    }

    #[must_use]
    pub fn with_hand_sizes(mut self, initial: usize, max: usize) -> Self {
        self.initial_hand_size = initial;
        self.max_hand_size = max;
        self
    }

    #[must_use]
    pub fn with_win_condition(mut self, condition: WinCondition) -> Self {
        self.win_condition = condition;
        self
    }

    #[must_use]
    pub fn with_values(mut self, values: ValueTable) -> Self {
        self.values = values;
        self
    }

    /// Total cards in play for this configuration.
    #[must_use]
    pub fn card_count(&self) -> usize {
        RANKED_CARDS + usize::from(self.joker_count)
    }

    /// Check the configuration can run a round with `player_count` seats.
    pub fn validate(&self, player_count: usize) -> Result<(), EngineError> {
        let invalid = |msg: String| Err(EngineError::InvalidConfig(msg));

        if player_count < 2 {
            return invalid(format!("need at least 2 players, got {}", player_count));
        }
        if self.round_count == 0 {
            return invalid("round_count must be at least 1".into());
        }
        if self.joker_count > 4 {
            return invalid(format!("joker_count {} exceeds 4", self.joker_count));
        }
        if self.base_rate == 0 {
            return invalid("base_rate must be at least 1".into());
        }
        if self.up_rate_threshold < 2 {
            return invalid("up_rate_threshold must be at least 2".into());
        }
        if self.rate_step < 2 {
            return invalid("rate_step must be at least 2".into());
        }
        if self.initial_hand_size == 0
            || self.initial_hand_size >= self.max_hand_size
            || self.max_hand_size > HAND_SIZE_CAP
        {
            return invalid(format!(
                "hand sizes must satisfy 1 <= initial ({}) < max ({}) <= {}",
                self.initial_hand_size, self.max_hand_size, HAND_SIZE_CAP
            ));
        }
        // Every seat gets its hand, one starter is flipped, one card stays to draw.
        let needed = player_count * self.initial_hand_size + 2;
        if needed > self.card_count() {
            return invalid(format!(
                "{} players with {} cards each need {} cards, deck has {}",
                player_count,
                self.initial_hand_size,
                needed,
                self.card_count()
            ));
        }
        if let Some(rank) = self.values.empty_ranks().next() {
            return invalid(format!("rank {} has no hand value", rank.number()));
        }
        if self.values.joker_values().is_empty() && self.joker_count > 0 {
            return invalid("jokers are in the deck but have no hand value".into());
        }
        Ok(())
    }

    /// Replace the hand values of one rank.
    #[must_use]
    pub fn with_rank_values(mut self, rank: Rank, values: &[i32]) -> Self {
        self.values = self.values.with_rank_values(rank, values);
        self
    }
}
