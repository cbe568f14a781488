//! Player intents and the accepted-action history.
//!
//! An `Intent` is what a human or bot asks the round to do. It is validated
//! against the current state before anything is mutated; accepted intents
//! are appended to the round history as `ActionRecord`s.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::cards::{Card, CardSet};

/// What a player asks to do.
///
/// ```
/// use dotenko::cards::Card;
/// use dotenko::core::Intent;
///
/// let stack = Intent::play(&[Card::spade(7), Card::heart(7)]);
/// assert_eq!(stack.cards().len(), 2);
/// assert!(Intent::Declare.is_declaration());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Claim dotenko (or shotenko while the starter is on top).
    Declare,
    /// Play one card, or a same-rank stack.
    Play(CardSet),
    /// Draw one card. In a challenge this is the contest draw.
    Draw,
    /// End the turn without playing. In a challenge, decline to contest.
    Pass,
    /// Concede the round with a full hand.
    Burst,
}

impl Intent {
    #[must_use]
    pub fn play(cards: &[Card]) -> Self {
        Self::Play(CardSet::from_slice(cards))
    }

    /// Cards carried by a play; empty for every other intent.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::Play(cards) => cards,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_declaration(&self) -> bool {
        matches!(self, Self::Declare)
    }

    /// Short label for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Declare => "declare",
            Self::Play(_) => "play",
            Self::Draw => "draw",
            Self::Pass => "pass",
            Self::Burst => "burst",
        }
    }
}

/// One accepted intent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub intent: Intent,
    /// Turn number the intent was accepted in.
    pub turn: u32,
    /// Position in the round's history, from 0.
    pub sequence: u32,
}
