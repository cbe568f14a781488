//! Round state: the single owned value every rule reads and only the round
//! machine mutates.
//!
//! ## Phase
//!
//! `Waiting → Dealing → Playing → DotenkoProcessing → Challenge? → Settling → Finished`
//!
//! ## RoundState
//!
//! Field, deck, hands, turn flags and the bookkeeping for declarations and
//! the shotenko challenge. Uses `im` vectors so a snapshot is an O(1) clone.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::error::EngineError;
use super::player::{PlayerId, PlayerMap};
use crate::cards::{Card, Deck, FieldStack, Hand};
use crate::scoring::{RateTracker, ScoreResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Lobby; nothing dealt yet.
    #[default]
    Waiting,
    Dealing,
    /// The turn loop. Declarations interrupt it at any time.
    Playing,
    /// A declaration was accepted; turn actions are frozen.
    DotenkoProcessing,
    /// Shotenko contest: eligible players each draw once or decline.
    Challenge,
    Settling,
    Finished,
}

impl Phase {
    /// Whether turn actions and declarations are accepted.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Phase::Playing | Phase::Challenge)
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finished)
    }
}

/// One seat's view of the round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: PlayerId,
    pub hand: Hand,
    /// Cumulative score carried from earlier rounds.
    pub score: i64,
    /// Standing by cumulative score, 1 is best.
    pub rank: u8,
    pub has_drawn_this_turn: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(id: PlayerId, score: i64) -> Self {
        Self {
            id,
            hand: Hand::new(),
            score,
            rank: 1,
            has_drawn_this_turn: false,
        }
    }
}

/// Everything live in one round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub phase: Phase,
    /// Starts at 1 with the first player's turn.
    pub turn_number: u32,
    /// Bumped on every accepted intent; scheduled decisions compare against it.
    pub version: u64,
    pub field: FieldStack,
    pub deck: Deck,
    pub players: PlayerMap<PlayerState>,
    pub current_turn: PlayerId,
    pub dotenko_winner: Option<PlayerId>,
    pub burst_player: Option<PlayerId>,
    /// Set while a shotenko claim is open or was decided.
    pub shotenko_claimant: Option<PlayerId>,
    /// Seats allowed one contest draw, in order after the claimant.
    pub revenge_eligible: Vec<PlayerId>,
    /// Eligible seats that have drawn or declined.
    pub challenge_acted: Vec<PlayerId>,
    /// Contesters whose draw qualified, in the order they qualified.
    pub challenge_participants: Vec<PlayerId>,
    pub rate: RateTracker,
    pub history: Vector<ActionRecord>,
    pub result: Option<ScoreResult>,
}

impl RoundState {
    #[must_use]
    pub fn new(deck: Deck, scores: &PlayerMap<i64>, first: PlayerId) -> Self {
        let players = PlayerMap::new(scores.player_count(), |p| PlayerState::new(p, scores[p]));
        Self {
            phase: Phase::Waiting,
            turn_number: 0,
            version: 0,
            field: FieldStack::default(),
            deck,
            players,
            current_turn: first,
            dotenko_winner: None,
            burst_player: None,
            shotenko_claimant: None,
            revenge_eligible: Vec::new(),
            challenge_acted: Vec::new(),
            challenge_participants: Vec::new(),
            rate: RateTracker::default(),
            history: Vector::new(),
            result: None,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn hand(&self, player: PlayerId) -> &Hand {
        &self.players[player].hand
    }

    #[must_use]
    pub fn field_top(&self) -> Option<Card> {
        self.field.top()
    }

    #[must_use]
    pub fn is_current(&self, player: PlayerId) -> bool {
        self.current_turn == player
    }

    /// Seats that still owe a challenge action.
    pub fn challenge_pending(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.revenge_eligible
            .iter()
            .copied()
            .filter(move |p| !self.challenge_acted.contains(p))
    }

    /// Every card of the round, in no particular order.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.players
            .values()
            .flat_map(|p| p.hand.iter().copied())
            .chain(self.field.iter().copied())
            .chain(self.deck.iter().copied())
    }

    /// Check card conservation and the per-player bounds.
    ///
    /// `full_set` must be sorted.
    pub fn verify(&self, full_set: &[Card], max_hand_size: usize) -> Result<(), EngineError> {
        let mut cards: Vec<Card> = self.all_cards().collect();
        cards.sort_unstable();
        if cards != full_set {
            return Err(EngineError::InvariantViolation(format!(
                "card accounting: {} cards in play, expected {}",
                cards.len(),
                full_set.len()
            )));
        }

        for (id, player) in self.players.iter() {
            if player.hand.len() > max_hand_size {
                return Err(EngineError::InvariantViolation(format!(
                    "{} holds {} cards, limit is {}",
                    id,
                    player.hand.len(),
                    max_hand_size
                )));
            }
            if player.has_drawn_this_turn && id != self.current_turn && self.phase == Phase::Playing {
                return Err(EngineError::InvariantViolation(format!(
                    "{} has a draw flag outside their turn",
                    id
                )));
            }
        }
        Ok(())
    }
}
