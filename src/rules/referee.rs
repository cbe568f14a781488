//! The rule oracle seen by the round machine and by bots.
//!
//! `RuleOracle` has three required checks; the enumeration helpers are
//! default methods built on top of them, so any implementation gets the
//! same play listing the round uses.

use rustc_hash::FxHashSet;

use super::legality::{self, DeclareContext};
use crate::cards::{Card, CardSet, Hand, ValueTable};
use crate::core::config::{GameRuleConfig, WinCondition};
use crate::core::error::IllegalReason;

/// Legality and hand evaluation, as pure callbacks.
///
/// ## Implementation Notes
///
/// - Every method must be deterministic for the same arguments
/// - `check_declaration` includes the ownership and window checks
pub trait RuleOracle {
    fn can_play(&self, candidate: &[Card], hand: &Hand, field_top: &Card) -> Result<(), IllegalReason>;

    fn check_declaration(&self, hand: &[Card], ctx: &DeclareContext) -> Result<(), IllegalReason>;

    fn hand_totals(&self, hand: &[Card]) -> FxHashSet<i32>;

    /// Whether two ranked cards share a hand value.
    fn matches_by_value(&self, card: &Card, field_top: &Card) -> bool;

    // === Convenience Methods ===

    fn can_declare_dotenko(&self, hand: &[Card], ctx: &DeclareContext) -> bool {
        self.check_declaration(hand, ctx).is_ok()
    }

    /// Every legal play of at most `max_cards` cards, singles first.
    fn legal_plays(&self, hand: &Hand, field_top: &Card, max_cards: usize) -> Vec<CardSet> {
        legality::candidate_sets(hand.cards(), max_cards)
            .into_iter()
            .filter(|set| self.can_play(set, hand, field_top).is_ok())
            .collect()
    }

    /// A legal stack implies each of its cards is legal alone, so singles
    /// decide this.
    fn has_legal_play(&self, hand: &Hand, field_top: &Card) -> bool {
        hand.iter().any(|card| self.can_play(&[*card], hand, field_top).is_ok())
    }
}

/// The rule oracle for one configured ruleset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Referee {
    condition: WinCondition,
    values: ValueTable,
}

impl Referee {
    #[must_use]
    pub fn new(condition: WinCondition, values: ValueTable) -> Self {
        Self { condition, values }
    }

    #[must_use]
    pub fn from_config(config: &GameRuleConfig) -> Self {
        Self::new(config.win_condition, config.values.clone())
    }

    #[must_use]
    pub fn values(&self) -> &ValueTable {
        &self.values
    }

    #[must_use]
    pub fn condition(&self) -> WinCondition {
        self.condition
    }
}

impl Default for Referee {
    fn default() -> Self {
        Self::new(WinCondition::default(), ValueTable::default())
    }
}

impl RuleOracle for Referee {
    fn can_play(&self, candidate: &[Card], hand: &Hand, field_top: &Card) -> Result<(), IllegalReason> {
        legality::can_play(candidate, hand, field_top, &self.values)
    }

    fn check_declaration(&self, hand: &[Card], ctx: &DeclareContext) -> Result<(), IllegalReason> {
        legality::check_declaration(hand, ctx, self.condition, &self.values)
    }

    fn hand_totals(&self, hand: &[Card]) -> FxHashSet<i32> {
        legality::hand_totals(hand, &self.values)
    }

    fn matches_by_value(&self, card: &Card, field_top: &Card) -> bool {
        self.values.shares_value(card, field_top)
    }
}
