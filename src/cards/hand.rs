//! A player's hand.
//!
//! Only the round machine mutates hands; every card enters by a move from
//! the deck and leaves by a move onto the field.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::Card;

/// Cards played together in one action. Inline up to a four-card stack.
pub type CardSet = SmallVec<[Card; 4]>;

/// Ordered multiset of cards owned by one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hand {
    cards: SmallVec<[Card; 8]>,
}

impl Hand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: SmallVec::from_slice(cards),
        }
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
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    #[must_use]
    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// Check that every card of `candidate` is in the hand, counting
    /// duplicates. Returns the first card that is missing.
    pub fn contains_all(&self, candidate: &[Card]) -> Result<(), Card> {
        let mut remaining = self.cards.clone();
        for card in candidate {
            match remaining.iter().position(|c| c == card) {
                Some(pos) => {
                    remaining.remove(pos);
                }
                None => return Err(*card),
            }
        }
        Ok(())
    }

    pub(crate) fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove `candidate` from the hand. Nothing is removed unless every
    /// card is present.
    pub(crate) fn remove_all(&mut self, candidate: &[Card]) -> Result<(), Card> {
        self.contains_all(candidate)?;
        for card in candidate {
            if let Some(pos) = self.cards.iter().position(|c| c == card) {
                self.cards.remove(pos);
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Hand {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::JokerColor;

    #[test]
    fn test_contains_all_counts_duplicates() {
        let joker = Card::joker(JokerColor::Black);
        let hand = Hand::from_cards(&[joker, Card::spade(3)]);

        assert!(hand.contains_all(&[joker, Card::spade(3)]).is_ok());
        assert_eq!(hand.contains_all(&[joker, joker]), Err(joker));
        assert_eq!(hand.contains_all(&[Card::heart(3)]), Err(Card::heart(3)));
    }

    #[test]
    fn test_remove_all_is_atomic() {
        let mut hand = Hand::from_cards(&[Card::spade(3), Card::club(9)]);

        assert!(hand.remove_all(&[Card::spade(3), Card::heart(1)]).is_err());
        assert_eq!(hand.len(), 2);

        assert!(hand.remove_all(&[Card::club(9)]).is_ok());
        assert_eq!(hand.cards(), &[Card::spade(3)]);
    }

    #[test]
    fn test_push_keeps_order() {
        let mut hand = Hand::new();
        hand.push(Card::diamond(2));
        hand.push(Card::heart(5));
        assert_eq!(hand.cards(), &[Card::diamond(2), Card::heart(5)]);
        assert!(hand.contains(&Card::heart(5)));
    }
}
