//! Fixed deals for replays and scenario tests.
//!
//! A layout pins some cards (hands, starter, the top or bottom of the deck,
//! cards already on the field). Every card it does not pin is shuffled into
//! the deck, or onto the field under the starter with
//! [`RoundLayout::remainder_to_field`]. The result always accounts for the
//! full card set.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck, FieldStack, Hand};
use crate::core::config::GameRuleConfig;
use crate::core::error::EngineError;
use crate::core::rng::GameRng;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLayout {
    hands: Vec<Vec<Card>>,
    starter: Card,
    /// Next cards to be drawn, first one drawn first.
    deck_top: Vec<Card>,
    /// Cards at the bottom of the deck, bottom-most first.
    deck_bottom: Vec<Card>,
    /// Cards under the starter, bottom-most first.
    field_history: Vec<Card>,
    remainder_to_field: bool,
    cycles_used: u32,
}

/// Cards of a laid-out round, ready to become a `RoundState`.
#[derive(Clone, Debug)]
pub(crate) struct LaidOut {
    pub hands: Vec<Hand>,
    pub field: FieldStack,
    pub deck: Deck,
    pub starter: Card,
}

impl RoundLayout {
    /// One hand per seat, in seat order.
    #[must_use]
    pub fn new(hands: Vec<Vec<Card>>, starter: Card) -> Self {
        Self {
            hands,
            starter,
            deck_top: Vec::new(),
            deck_bottom: Vec::new(),
            field_history: Vec::new(),
            remainder_to_field: false,
            cycles_used: 0,
        }
    }

    #[must_use]
    pub fn with_deck_top(mut self, cards: &[Card]) -> Self {
        self.deck_top = cards.to_vec();
        self
    }

    #[must_use]
    pub fn with_deck_bottom(mut self, cards: &[Card]) -> Self {
        self.deck_bottom = cards.to_vec();
        self
    }

    #[must_use]
    pub fn with_field_history(mut self, cards: &[Card]) -> Self {
        self.field_history = cards.to_vec();
        self
    }

    /// Put unpinned cards on the field instead of in the deck.
    #[must_use]
    pub fn remainder_to_field(mut self) -> Self {
        self.remainder_to_field = true;
        self
    }

    /// Start as if the deck had already been reshuffled this many times.
    #[must_use]
    pub fn with_cycles_used(mut self, cycles: u32) -> Self {
        self.cycles_used = cycles;
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.hands.len()
    }

    pub(crate) fn build(&self, config: &GameRuleConfig, rng: &mut GameRng) -> Result<LaidOut, EngineError> {
        if let Some((seat, hand)) = self
            .hands
            .iter()
            .enumerate()
            .find(|(_, h)| h.len() > config.max_hand_size)
        {
            return Err(EngineError::InvariantViolation(format!(
                "layout gives seat {} {} cards, limit is {}",
                seat,
                hand.len(),
                config.max_hand_size
            )));
        }

        let mut remainder = Card::full_set(config.joker_count);
        let pinned = self
            .hands
            .iter()
            .flatten()
            .chain(std::iter::once(&self.starter))
            .chain(&self.deck_top)
            .chain(&self.deck_bottom)
            .chain(&self.field_history);
        for card in pinned {
            match remainder.iter().position(|c| c == card) {
                Some(pos) => {
                    remainder.swap_remove(pos);
                }
                None => {
                    return Err(EngineError::InvariantViolation(format!(
                        "layout uses {} more often than the deck holds it",
                        card
                    )))
                }
            }
        }
        // swap_remove scrambles order; sort before shuffling so the seed alone decides it.
        remainder.sort_unstable();
        rng.shuffle(&mut remainder);

        let mut history = self.field_history.clone();
        let mut deck_cards = self.deck_bottom.clone();
        if self.remainder_to_field {
            history.extend(remainder);
        } else {
            deck_cards.extend(remainder);
        }
        deck_cards.extend(self.deck_top.iter().rev());

        Ok(LaidOut {
            hands: self.hands.iter().map(|h| Hand::from_cards(h)).collect(),
            field: FieldStack::with_history(&history, self.starter),
            deck: Deck::from_cards(deck_cards, config.deck_cycle_limit).with_cycles_used(self.cycles_used),
            starter: self.starter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder_goes_to_deck() {
        let layout = RoundLayout::new(vec![vec![Card::spade(1)], vec![Card::spade(2)]], Card::club(7))
            .with_deck_top(&[Card::heart(3), Card::heart(4)]);
        let config = GameRuleConfig::default();
        let mut laid = layout.build(&config, &mut GameRng::new(1)).unwrap();

        assert_eq!(laid.field.len(), 1);
        assert_eq!(laid.deck.len(), 54 - 3);
        assert_eq!(laid.deck.draw(), Ok(Card::heart(3)));
        assert_eq!(laid.deck.draw(), Ok(Card::heart(4)));
    }

    #[test]
    fn test_remainder_to_field_empties_deck() {
        let layout = RoundLayout::new(vec![vec![Card::spade(1)], vec![Card::spade(2)]], Card::club(7))
            .with_deck_top(&[Card::heart(3)])
            .remainder_to_field()
            .with_cycles_used(1);
        let config = GameRuleConfig::default();
        let laid = layout.build(&config, &mut GameRng::new(1)).unwrap();

        assert_eq!(laid.deck.len(), 1);
        assert!(!laid.deck.can_reshuffle());
        assert_eq!(laid.field.len(), 54 - 3);
        assert_eq!(laid.field.top(), Some(Card::club(7)));
    }

    #[test]
    fn test_deck_bottom_sets_settlement_card() {
        let layout = RoundLayout::new(vec![vec![], vec![]], Card::club(7)).with_deck_bottom(&[Card::diamond(12)]);
        let laid = layout.build(&GameRuleConfig::default(), &mut GameRng::new(3)).unwrap();
        assert_eq!(laid.deck.settlement_card(), Some(Card::diamond(12)));
    }

    #[test]
    fn test_duplicate_card_rejected() {
        let layout = RoundLayout::new(vec![vec![Card::spade(1)], vec![Card::spade(1)]], Card::club(7));
        let err = layout.build(&GameRuleConfig::default(), &mut GameRng::new(1)).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_joker_rejected() {
        let joker = Card::joker(crate::cards::JokerColor::Black);
        let layout = RoundLayout::new(vec![vec![joker], vec![]], Card::club(7));
        let config = GameRuleConfig::default().with_jokers(0);
        assert!(layout.build(&config, &mut GameRng::new(1)).is_err());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let layout = RoundLayout::new(vec![vec![], vec![]], Card::club(7));
        let config = GameRuleConfig::default();
        let a = layout.build(&config, &mut GameRng::new(8)).unwrap();
        let b = layout.build(&config, &mut GameRng::new(8)).unwrap();
        assert_eq!(a.deck, b.deck);
    }
}
