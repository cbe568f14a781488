//! The shared discard pile.
//!
//! Only the top card matters for legality. The full sequence is kept for
//! rate runs, recycling into the deck, and the settlement fallback.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::card::Card;
use crate::core::player::PlayerId;

/// Empty before the deal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStack {
    /// Bottom first; the top card is last.
    cards: Vector<Card>,
    /// Who played the current top card. `None` while the starter is on top.
    top_owner: Option<PlayerId>,
}

impl FieldStack {
    /// A field holding only the flipped starter card.
    #[must_use]
    pub fn new(starter: Card) -> Self {
        let mut cards = Vector::new();
        cards.push_back(starter);
        Self {
            cards,
            top_owner: None,
        }
    }

    /// A field with earlier cards underneath the starter. Used to rebuild
    /// mid-round positions.
    #[must_use]
    pub fn with_history(history: &[Card], starter: Card) -> Self {
        let mut cards: Vector<Card> = history.iter().copied().collect();
        cards.push_back(starter);
        Self {
            cards,
            top_owner: None,
        }
    }

    /// The card every play is matched against.
    #[must_use]
    pub fn top(&self) -> Option<Card> {
        self.cards.back().copied()
    }

    #[must_use]
    pub fn top_owner(&self) -> Option<PlayerId> {
        self.top_owner
    }

    /// True while nobody has played on the starter.
    #[must_use]
    pub fn is_starter_on_top(&self) -> bool {
        self.top_owner.is_none()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Put `cards` on the field in order; the last one becomes the top.
    pub(crate) fn push_play(&mut self, player: PlayerId, cards: &[Card]) {
        for card in cards {
            self.cards.push_back(*card);
        }
        if !cards.is_empty() {
            self.top_owner = Some(player);
        }
    }

    /// Remove every card except the top, bottom first, for a reshuffle.
    pub(crate) fn take_recyclable(&mut self) -> Vec<Card> {
        let keep = self.cards.len().saturating_sub(1);
        let top = self.cards.split_off(keep);
        let recycled = std::mem::replace(&mut self.cards, top);
        recycled.into_iter().collect()
    }

    /// Give cards back after a refused reshuffle, underneath the top.
    pub(crate) fn restore_underneath(&mut self, cards: Vec<Card>) {
        let mut restored: Vector<Card> = cards.into_iter().collect();
        restored.append(std::mem::take(&mut self.cards));
        self.cards = restored;
    }

    /// Bottom-most ranked card, the settlement fallback when the deck has none.
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
    fn test_starter_has_no_owner() {
        let field = FieldStack::new(Card::club(7));
        assert_eq!(field.top(), Some(Card::club(7)));
        assert!(field.is_starter_on_top());
        assert_eq!(field.len(), 1);
    }

    #[test]
    fn test_push_play_sets_owner_and_top() {
        let mut field = FieldStack::new(Card::club(7));
        field.push_play(PlayerId::new(1), &[Card::spade(7), Card::heart(7)]);
        assert_eq!(field.top(), Some(Card::heart(7)));
        assert_eq!(field.top_owner(), Some(PlayerId::new(1)));
        assert_eq!(field.len(), 3);
    }

    #[test]
    fn test_take_recyclable_keeps_top() {
        let mut field = FieldStack::with_history(&[Card::spade(1), Card::spade(2)], Card::spade(3));
        field.push_play(PlayerId::new(0), &[Card::spade(4)]);

        let recycled = field.take_recyclable();
        assert_eq!(recycled, vec![Card::spade(1), Card::spade(2), Card::spade(3)]);
        assert_eq!(field.len(), 1);
        assert_eq!(field.top(), Some(Card::spade(4)));
        assert_eq!(field.top_owner(), Some(PlayerId::new(0)));
    }

    #[test]
    fn test_restore_underneath() {
        let mut field = FieldStack::with_history(&[Card::spade(1)], Card::spade(3));
        let recycled = field.take_recyclable();
        field.restore_underneath(recycled);
        assert_eq!(field.iter().copied().collect::<Vec<_>>(), vec![Card::spade(1), Card::spade(3)]);
    }

    #[test]
    fn test_settlement_fallback_skips_jokers() {
        let field = FieldStack::with_history(&[Card::joker(JokerColor::Red)], Card::heart(12));
        assert_eq!(field.settlement_card(), Some(Card::heart(12)));
    }
}
