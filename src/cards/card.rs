//! Card identity: suit, rank and joker color.
//!
//! Cards are immutable `Copy` values. Two jokers of the same color are
//! indistinguishable, so card accounting compares multisets.

use serde::{Deserialize, Serialize};

/// Joker color, alternating black/red as jokers are added to the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JokerColor {
    Black,
    Red,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Suit {
    Spade,
    Club,
    Heart,
    Diamond,
    Joker(JokerColor),
}

impl Suit {
    /// The four ranked suits in deck order.
    pub const RANKED: [Suit; 4] = [Suit::Spade, Suit::Club, Suit::Heart, Suit::Diamond];

    #[must_use]
    pub fn is_joker(self) -> bool {
        matches!(self, Suit::Joker(_))
    }
}

/// Card rank, 1 (ace) through 13 (king).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rank(u8);

impl Rank {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 13;

    /// Checked constructor.
    #[must_use]
    pub const fn new(number: u8) -> Option<Self> {
        if number >= Self::MIN && number <= Self::MAX {
            Some(Self(number))
        } else {
            None
        }
    }

    /// Constructor for literal ranks.
    ///
    /// Panics if `number` is outside 1..=13.
    #[must_use]
    pub const fn of(number: u8) -> Self {
        assert!(number >= Self::MIN && number <= Self::MAX, "Rank must be 1-13");
        Self(number)
    }

    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = Rank> {
        (Self::MIN..=Self::MAX).map(Rank)
    }
}

/// A playing card. `rank` is `None` exactly for jokers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    suit: Suit,
    rank: Option<Rank>,
}

impl Card {
    #[must_use]
    pub const fn ranked(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank: Some(rank),
        }
    }

    #[must_use]
    pub const fn joker(color: JokerColor) -> Self {
        Self {
            suit: Suit::Joker(color),
            rank: None,
        }
    }

    #[must_use]
    pub const fn spade(rank: u8) -> Self {
        Self::ranked(Suit::Spade, Rank::of(rank))
    }

    #[must_use]
    pub const fn club(rank: u8) -> Self {
        Self::ranked(Suit::Club, Rank::of(rank))
    }

    #[must_use]
    pub const fn heart(rank: u8) -> Self {
        Self::ranked(Suit::Heart, Rank::of(rank))
    }

    #[must_use]
    pub const fn diamond(rank: u8) -> Self {
        Self::ranked(Suit::Diamond, Rank::of(rank))
    }

    #[must_use]
    pub const fn suit(self) -> Suit {
        self.suit
    }

    #[must_use]
    pub const fn rank(self) -> Option<Rank> {
        self.rank
    }

    #[must_use]
    pub const fn is_joker(self) -> bool {
        self.rank.is_none()
    }

    /// Face number used for settlement; `None` for jokers.
    #[must_use]
    pub fn face_value(self) -> Option<u8> {
        self.rank.map(Rank::number)
    }

    /// Every card of a deck with `joker_count` jokers, in a fixed order.
    ///
    /// ```
    /// use dotenko::cards::Card;
    ///
    /// let set = Card::full_set(2);
    /// assert_eq!(set.len(), 54);
    /// assert_eq!(set.iter().filter(|c| c.is_joker()).count(), 2);
    /// ```
    #[must_use]
    pub fn full_set(joker_count: u8) -> Vec<Card> {
        let mut cards: Vec<Card> = Suit::RANKED
            .iter()
            .flat_map(|&suit| Rank::all().map(move |rank| Card::ranked(suit, rank)))
            .collect();
        for i in 0..joker_count {
            let color = if i % 2 == 0 {
                JokerColor::Black
            } else {
                JokerColor::Red
            };
            cards.push(Card::joker(color));
        }
        cards
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = |r: Rank| match r.number() {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            n => n.to_string(),
        };
        match (self.suit, self.rank) {
            (Suit::Joker(JokerColor::Black), _) => write!(f, "Joker(black)"),
            (Suit::Joker(JokerColor::Red), _) => write!(f, "Joker(red)"),
            (suit, Some(r)) => {
                let symbol = match suit {
                    Suit::Spade => '♠',
                    Suit::Club => '♣',
                    Suit::Heart => '♥',
                    _ => '♦',
                };
                write!(f, "{}{}", symbol, rank(r))
            }
            (_, None) => write!(f, "?"),
        }
    }
}
