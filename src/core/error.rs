//! Engine error taxonomy.
//!
//! Player-caused rule violations (`IllegalAction`) and out-of-date intents
//! (`StaleAction`) are recovered locally and leave the round untouched.
//! `EmptyDeck` and `CycleLimitExceeded` are raised by the deck model; the
//! round machine turns them into a no-winner resolution instead of a fault.
//! Only `InvariantViolation` is fatal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::PlayerId;
use super::state::Phase;
use crate::cards::Card;

/// Everything the engine can refuse or fail with.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("illegal action: {0}")]
    IllegalAction(#[from] IllegalReason),

    #[error("stale action from {player}: {reason}")]
    StaleAction { player: PlayerId, reason: StaleReason },

    #[error("deck is empty")]
    EmptyDeck,

    #[error("deck cycle limit of {limit} reached")]
    CycleLimitExceeded { limit: u32 },

    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl EngineError {
    pub(crate) fn stale(player: PlayerId, reason: StaleReason) -> Self {
        Self::StaleAction { player, reason }
    }

    /// True only for errors that must halt round processing.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleAction { .. })
    }

    /// The player-facing reason, if this is a rule violation.
    #[must_use]
    pub fn illegal_reason(&self) -> Option<&IllegalReason> {
        match self {
            Self::IllegalAction(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Why a candidate action breaks the rules. `Display` is shown to the player.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IllegalReason {
    #[error("no cards selected")]
    NoCards,

    #[error("{0} is not in your hand")]
    NotInHand(Card),

    #[error("{card} matches {field_top} by neither value nor suit")]
    NoMatch { card: Card, field_top: Card },

    #[error("stacked cards must share one rank")]
    MixedRanks,

    #[error("hand does not satisfy the win condition")]
    NotDotenko,

    #[error("cannot declare on a card you played")]
    OwnCard,

    #[error("already drew this turn")]
    AlreadyDrawn,

    #[error("hand is full ({0} cards)")]
    HandFull(usize),

    #[error("a legal play is available")]
    PlayAvailable,

    #[error("draw before passing")]
    MustDraw,

    #[error("hand is full with no legal play; burst")]
    MustBurst,

    #[error("burst requires a full hand with no legal play")]
    BurstNotForced,

    #[error("already acted in this challenge")]
    AlreadyChallenged,

    #[error("{0} is not seated at this table")]
    UnknownPlayer(PlayerId),
}

/// Why an intent no longer applies.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum StaleReason {
    #[error("phase {0:?} does not accept this action")]
    Phase(Phase),

    #[error("not this player's turn")]
    NotYourTurn,

    #[error("round state moved on since the decision was scheduled")]
    Outdated,

    #[error("decision cancelled")]
    Cancelled,
}
