//! Draw pile with a bounded reshuffle counter.
//!
//! The top of the deck is the back of the vector. When the deck runs out the
//! round recycles the field (all but its top card) through [`Deck::reshuffle`],
//! which counts one deck cycle.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::error::EngineError;
use crate::core::rng::GameRng;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Index 0 is the bottom, last index is the top.
    cards: Vector<Card>,
    cycles_used: u32,
    /// `None` allows unlimited reshuffles.
    cycle_limit: Option<u32>,
}

impl Deck {
    /// 52 ranked cards plus `joker_count` jokers, shuffled.
    #[must_use]
    pub fn build(joker_count: u8, cycle_limit: Option<u32>, rng: &mut GameRng) -> Self {
        let mut cards = Card::full_set(joker_count);
        rng.shuffle(&mut cards);
        Self::from_cards(cards, cycle_limit)
    }

    /// A deck in the given order, bottom first.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>, cycle_limit: Option<u32>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
            cycles_used: 0,
            cycle_limit,
        }
    }

    #[must_use]
    pub fn with_cycles_used(mut self, cycles_used: u32) -> Self {
        self.cycles_used = cycles_used;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn cycles_used(&self) -> u32 {
        self.cycles_used
    }

    #[must_use]
    pub fn cycle_limit(&self) -> Option<u32> {
        self.cycle_limit
    }

    /// Whether one more reshuffle is permitted.
    #[must_use]
    pub fn can_reshuffle(&self) -> bool {
        self.cycle_limit.map_or(true, |limit| self.cycles_used < limit)
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Take the top card.
    pub fn draw(&mut self) -> Result<Card, EngineError> {
        self.cards.pop_back().ok_or(EngineError::EmptyDeck)
    }

    /// Refill an empty deck from discarded cards and count a cycle.
    ///
    /// Returns the new cycle count. On error nothing is consumed and the
    /// caller still owns `discarded`.
    pub fn reshuffle(&mut self, discarded: Vec<Card>, rng: &mut GameRng) -> Result<u32, (EngineError, Vec<Card>)> {
        if let Some(limit) = self.cycle_limit {
            if self.cycles_used >= limit {
                return Err((EngineError::CycleLimitExceeded { limit }, discarded));
            }
        }
        if discarded.is_empty() {
            return Err((EngineError::EmptyDeck, discarded));
        }

        let mut cards = discarded;
        cards.extend(self.cards.iter().copied());
        rng.shuffle(&mut cards);
        self.cards = cards.into_iter().collect();
        self.cycles_used += 1;
        Ok(self.cycles_used)
    }

    /// The bottom-most ranked card, flipped to price a settlement.
    #[must_use]
    pub fn settlement_card(&self) -> Option<Card> {
        self.cards.iter().find(|c| !c.is_joker()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::JokerColor;

    #[test]
    fn test_build_contains_full_set() {
        let mut rng = GameRng::new(42);
        let deck = Deck::build(2, Some(1), &mut rng);
        assert_eq!(deck.len(), 54);

        let mut cards: Vec<_> = deck.iter().copied().collect();
        cards.sort();
        let mut expected = Card::full_set(2);
        expected.sort();
        assert_eq!(cards, expected);
    }

    #[test]
    fn test_build_is_shuffled_deterministically() {
        let a = Deck::build(0, None, &mut GameRng::new(5));
        let b = Deck::build(0, None, &mut GameRng::new(5));
        let c = Deck::build(0, None, &mut GameRng::new(6));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_draw_from_top() {
        let mut deck = Deck::from_cards(vec![Card::spade(1), Card::spade(2)], None);
        assert_eq!(deck.draw(), Ok(Card::spade(2)));
        assert_eq!(deck.draw(), Ok(Card::spade(1)));
        assert_eq!(deck.draw(), Err(EngineError::EmptyDeck));
    }

    #[test]
    fn test_reshuffle_counts_cycles() {
        let mut rng = GameRng::new(1);
        let mut deck = Deck::from_cards(Vec::new(), Some(1));
        assert!(deck.can_reshuffle());

        let cycle = deck.reshuffle(vec![Card::heart(4), Card::heart(5)], &mut rng);
        assert_eq!(cycle, Ok(1));
        assert_eq!(deck.len(), 2);
        assert!(!deck.can_reshuffle());
    }

    #[test]
    fn test_reshuffle_over_limit_returns_cards() {
        let mut rng = GameRng::new(1);
        let mut deck = Deck::from_cards(Vec::new(), Some(1)).with_cycles_used(1);

        let discarded = vec![Card::club(3)];
        match deck.reshuffle(discarded, &mut rng) {
            Err((EngineError::CycleLimitExceeded { limit }, back)) => {
                assert_eq!(limit, 1);
                assert_eq!(back, vec![Card::club(3)]);
            }
            other => panic!("expected cycle limit, got {:?}", other),
        }
        assert!(deck.is_empty());
    }

    #[test]
    fn test_unlimited_cycles() {
        let mut rng = GameRng::new(1);
        let mut deck = Deck::from_cards(Vec::new(), None).with_cycles_used(50);
        assert!(deck.can_reshuffle());
        assert_eq!(deck.reshuffle(vec![Card::club(3)], &mut rng), Ok(51));
    }

    #[test]
    fn test_settlement_card_skips_jokers() {
        let deck = Deck::from_cards(
            vec![Card::joker(JokerColor::Black), Card::diamond(9), Card::spade(2)],
            None,
        );
        assert_eq!(deck.settlement_card(), Some(Card::diamond(9)));
        assert_eq!(Deck::from_cards(Vec::new(), None).settlement_card(), None);
    }
}
