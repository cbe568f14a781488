//! Rate escalation from consecutive same-rank plays.
//!
//! A run counts plays, not cards: a stack play counts once, the flipped
//! starter counts once, and an all-joker play extends whatever run is open.
//! Each time the run length reaches a multiple of the threshold the
//! multiplier is multiplied by the configured step.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTracker {
    multiplier: u64,
    run_rank: Option<Rank>,
    run_plays: u32,
    /// Cards of the open run not yet credited to an escalation.
    run_cards: Vec<Card>,
    rate_cards: Vec<Card>,
    escalations: u32,
}

impl Default for RateTracker {
    fn default() -> Self {
        Self {
            multiplier: 1,
            run_rank: None,
            run_plays: 0,
            run_cards: Vec::new(),
            rate_cards: Vec::new(),
            escalations: 0,
        }
    }
}

impl RateTracker {
    /// Open the first run with the starter. A joker starter opens none.
    #[must_use]
    pub fn start(starter: Card) -> Self {
        let mut tracker = Self::default();
        if let Some(rank) = starter.rank() {
            tracker.run_rank = Some(rank);
            tracker.run_plays = 1;
            tracker.run_cards.push(starter);
        }
        tracker
    }

    /// Record one accepted play. Returns true if it escalated the rate.
    pub fn record_play(&mut self, cards: &[Card], threshold: u32, step: u64) -> bool {
        let rank = cards.iter().find_map(|c| c.rank());
        match rank {
            None if self.run_rank.is_none() => return false,
            None => self.run_plays += 1,
            Some(rank) if self.run_rank == Some(rank) => self.run_plays += 1,
            Some(rank) => {
                self.run_rank = Some(rank);
                self.run_plays = 1;
                self.run_cards.clear();
            }
        }
        self.run_cards.extend_from_slice(cards);

        if threshold == 0 || self.run_plays % threshold != 0 {
            return false;
        }
        self.multiplier = self.multiplier.saturating_mul(step);
        self.escalations += 1;
        self.rate_cards.append(&mut self.run_cards);
        true
    }

    #[must_use]
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    /// Length of the open run, in plays.
    #[must_use]
    pub fn run_length(&self) -> u32 {
        self.run_plays
    }

    #[must_use]
    pub fn run_rank(&self) -> Option<Rank> {
        self.run_rank
    }

    /// Cards of every run that triggered an escalation.
    #[must_use]
    pub fn rate_cards(&self) -> &[Card] {
        &self.rate_cards
    }

    #[must_use]
    pub fn escalations(&self) -> u32 {
        self.escalations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::JokerColor;

    #[test]
    fn test_stack_below_threshold_keeps_multiplier() {
        let mut rate = RateTracker::start(Card::club(7));
        let up = rate.record_play(&[Card::spade(7), Card::heart(7)], 3, 2);
        assert!(!up);
        assert_eq!(rate.run_length(), 2);
        assert_eq!(rate.multiplier(), 1);
    }

    #[test]
    fn test_third_play_escalates() {
        let mut rate = RateTracker::start(Card::club(7));
        rate.record_play(&[Card::spade(7)], 3, 2);
        assert!(rate.record_play(&[Card::heart(7)], 3, 2));
        assert_eq!(rate.multiplier(), 2);
        assert_eq!(rate.rate_cards(), &[Card::club(7), Card::spade(7), Card::heart(7)]);
    }

    #[test]
    fn test_escalations_multiply() {
        let mut rate = RateTracker::start(Card::club(4));
        for card in [Card::spade(4), Card::heart(4), Card::diamond(4)] {
            rate.record_play(&[card], 2, 3);
        }
        // Runs of 2 and 4 plays.
        assert_eq!(rate.multiplier(), 9);
        assert_eq!(rate.escalations(), 2);
        assert_eq!(rate.rate_cards().len(), 4);
    }

    #[test]
    fn test_rank_change_resets_run() {
        let mut rate = RateTracker::start(Card::club(7));
        rate.record_play(&[Card::spade(7)], 3, 2);
        rate.record_play(&[Card::spade(8)], 3, 2);
        assert_eq!(rate.run_length(), 1);
        assert_eq!(rate.run_rank(), Rank::new(8));
        assert!(!rate.record_play(&[Card::heart(8)], 3, 2));
        assert_eq!(rate.multiplier(), 1);
    }

    #[test]
    fn test_joker_extends_run() {
        let joker = Card::joker(JokerColor::Black);
        let mut rate = RateTracker::start(Card::club(9));
        rate.record_play(&[Card::heart(9)], 3, 2);
        assert!(rate.record_play(&[joker], 3, 2));
        assert!(rate.rate_cards().contains(&joker));
    }

    #[test]
    fn test_joker_starter_opens_no_run() {
        let joker = Card::joker(JokerColor::Red);
        let mut rate = RateTracker::start(joker);
        assert_eq!(rate.run_length(), 0);
        assert!(!rate.record_play(&[Card::joker(JokerColor::Black)], 2, 2));
        assert_eq!(rate.run_length(), 0);
        rate.record_play(&[Card::spade(2)], 2, 2);
        assert_eq!(rate.run_length(), 1);
    }
}
