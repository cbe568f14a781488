//! Round events and observers.
//!
//! Every accepted intent returns the events it caused, in order. The table
//! forwards them to a `RoundObserver`, which is how the render layer learns
//! about phase changes and settlements without polling snapshots.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardSet};
use crate::core::player::PlayerId;
use crate::core::state::Phase;
use crate::scoring::ScoreResult;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    PhaseChanged { from: Phase, to: Phase },
    Dealt { starter: Card, first: PlayerId },
    CardsPlayed { player: PlayerId, cards: CardSet },
    CardDrawn { player: PlayerId, card: Card },
    DeckReshuffled { cycle: u32, cards: usize },
    DeckExhausted,
    RateUp { multiplier: u64 },
    Passed { player: PlayerId },
    TurnChanged { player: PlayerId, turn: u32 },
    Declared { player: PlayerId, shotenko: bool },
    ChallengeDrawn { player: PlayerId, card: Card, qualified: bool },
    ChallengeDeclined { player: PlayerId },
    Burst { player: PlayerId },
    ScoreSettled(ScoreResult),
}

impl RoundEvent {
    /// Whether the field top changed, which reopens the declaration race.
    #[must_use]
    pub fn changes_field(&self) -> bool {
        matches!(self, RoundEvent::CardsPlayed { .. } | RoundEvent::Dealt { .. })
    }
}

/// Outcome of an accepted intent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Applied {
    pub events: Vec<RoundEvent>,
}

impl Applied {
    #[must_use]
    pub fn changes_field(&self) -> bool {
        self.events.iter().any(RoundEvent::changes_field)
    }

    /// The phase the intent left the round in, if it moved.
    #[must_use]
    pub fn final_phase(&self) -> Option<Phase> {
        self.events.iter().rev().find_map(|e| match e {
            RoundEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
    }
}

/// Notification sink for the render layer.
///
/// All methods default to no-ops; implement the ones you need.
pub trait RoundObserver {
    fn on_event(&mut self, _event: &RoundEvent) {}

    fn on_phase_change(&mut self, _from: Phase, _to: Phase) {}

    fn on_score_settled(&mut self, _result: &ScoreResult) {}
}

impl RoundObserver for () {}

/// Forward `events` to `observer`, calling the specific hooks as well.
pub fn dispatch<O: RoundObserver + ?Sized>(observer: &mut O, events: &[RoundEvent]) {
    for event in events {
        observer.on_event(event);
        match event {
            RoundEvent::PhaseChanged { from, to } => observer.on_phase_change(*from, *to),
            RoundEvent::ScoreSettled(result) => observer.on_score_settled(result),
            _ => {}
        }
    }
}

/// Observer that records everything it is told.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<RoundEvent>,
    pub phases: Vec<Phase>,
    pub results: Vec<ScoreResult>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.phases.clear();
        self.results.clear();
    }

    /// Count events matching `pred`.
    pub fn count(&self, pred: impl Fn(&RoundEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl RoundObserver for EventLog {
    fn on_event(&mut self, event: &RoundEvent) {
        self.events.push(event.clone());
    }

    fn on_phase_change(&mut self, _from: Phase, to: Phase) {
        self.phases.push(to);
    }

    fn on_score_settled(&mut self, result: &ScoreResult) {
        self.results.push(result.clone());
    }
}
