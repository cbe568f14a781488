//! Shotenko challenge sub-round.
//!
//! A declaration while the starter is still on top opens a challenge. Every
//! other seat, in order after the claimant, may draw one card to contest or
//! decline. Contesters whose draw makes their hand qualify against the
//! starter are queued; the first one overturns the claim.

use tracing::info;

use super::event::RoundEvent;
use super::machine::Round;
use crate::core::action::Intent;
use crate::core::error::{EngineError, IllegalReason, StaleReason};
use crate::core::player::PlayerId;
use crate::core::state::Phase;
use crate::rules::{DeclareContext, RuleOracle};
use crate::scoring::Outcome;

impl Round {
    pub(super) fn open_challenge(&mut self, claimant: PlayerId, events: &mut Vec<RoundEvent>) {
        let count = self.player_count();
        let state = self.state_mut();
        state.shotenko_claimant = Some(claimant);
        state.revenge_eligible = claimant.others_in_order(count).collect();
        state.challenge_acted.clear();
        state.challenge_participants.clear();
        self.set_phase(Phase::Challenge, events);
    }

    pub(super) fn validate_challenge(&self, player: PlayerId, intent: &Intent) -> Result<(), EngineError> {
        if !matches!(intent, Intent::Draw | Intent::Pass) {
            return Err(EngineError::stale(player, StaleReason::Phase(Phase::Challenge)));
        }
        let state = self.snapshot();
        if !state.revenge_eligible.contains(&player) {
            return Err(EngineError::stale(player, StaleReason::NotYourTurn));
        }
        if state.challenge_acted.contains(&player) {
            return Err(IllegalReason::AlreadyChallenged.into());
        }
        let held = state.hand(player).len();
        if matches!(intent, Intent::Draw) && held >= self.config().max_hand_size {
            return Err(IllegalReason::HandFull(held).into());
        }
        Ok(())
    }

    pub(super) fn apply_challenge_draw(
        &mut self,
        player: PlayerId,
        events: &mut Vec<RoundEvent>,
    ) -> Result<(), EngineError> {
        match self.draw_card(events)? {
            Some(card) => {
                self.state_mut().players[player].hand.push(card);
                let qualified = self.contest_qualifies(player)?;
                if qualified {
                    info!(player = %player, "challenge draw qualifies");
                    self.state_mut().challenge_participants.push(player);
                }
                events.push(RoundEvent::ChallengeDrawn {
                    player,
                    card,
                    qualified,
                });
            }
            // Nothing left to draw counts as declining.
            None => events.push(RoundEvent::ChallengeDeclined { player }),
        }
        self.state_mut().challenge_acted.push(player);
        self.finish_challenge_if_done(events)
    }

    pub(super) fn apply_challenge_decline(
        &mut self,
        player: PlayerId,
        events: &mut Vec<RoundEvent>,
    ) -> Result<(), EngineError> {
        events.push(RoundEvent::ChallengeDeclined { player });
        self.state_mut().challenge_acted.push(player);
        self.finish_challenge_if_done(events)
    }

    fn contest_qualifies(&self, player: PlayerId) -> Result<bool, EngineError> {
        let state = self.snapshot();
        let starter = state
            .field_top()
            .ok_or_else(|| EngineError::InvariantViolation("challenge without a starter".into()))?;
        let ctx = DeclareContext {
            field_top: starter,
            top_owner: None,
            declarant: player,
            window_open: true,
        };
        Ok(self.referee().can_declare_dotenko(state.hand(player).cards(), &ctx))
    }

    fn finish_challenge_if_done(&mut self, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        if self.snapshot().challenge_pending().next().is_some() {
            return Ok(());
        }
        let state = self.snapshot();
        let claimant = state
            .shotenko_claimant
            .ok_or_else(|| EngineError::InvariantViolation("challenge without a claimant".into()))?;

        let outcome = match state.challenge_participants.first() {
            None => Outcome::Shotenko { winner: claimant },
            Some(&contester) => Outcome::ShotenkoOverturned { claimant, contester },
        };
        let winner = match outcome {
            Outcome::ShotenkoOverturned { contester, .. } => contester,
            _ => claimant,
        };
        info!(claimant = %claimant, winner = %winner, "challenge closed");
        self.state_mut().dotenko_winner = Some(winner);
        self.settle(outcome, events)
    }
}

#[cfg(test)]
mod tests {
    use crate::cards::Card;
    use crate::core::action::Intent;
    use crate::core::config::GameRuleConfig;
    use crate::core::error::{IllegalReason, StaleReason};
    use crate::core::player::{PlayerId, PlayerMap};
    use crate::core::rng::GameRng;
    use crate::core::state::Phase;
    use crate::core::EngineError;
    use crate::round::{Round, RoundLayout};
    use crate::scoring::Outcome;

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n)
    }

    /// Seat 1 holds 4 + 5 against a starter of 9.
    fn shotenko_round(deck_top: &[Card]) -> Round {
        let layout = RoundLayout::new(
            vec![
                vec![Card::heart(2), Card::heart(3)],
                vec![Card::spade(4), Card::club(5)],
                vec![Card::diamond(1), Card::diamond(2)],
            ],
            Card::diamond(9),
        )
        .with_deck_top(deck_top);
        let scores = PlayerMap::with_value(3, 0);
        Round::with_layout(GameRuleConfig::default(), &scores, p(0), &layout, &GameRng::new(2)).unwrap()
    }

    #[test]
    fn test_shotenko_opens_challenge() {
        let mut round = shotenko_round(&[]);
        round.submit_intent(p(1), Intent::Declare).unwrap();

        let state = round.snapshot();
        assert_eq!(state.phase, Phase::Challenge);
        assert_eq!(state.shotenko_claimant, Some(p(1)));
        assert_eq!(state.revenge_eligible, vec![p(2), p(0)]);
    }

    #[test]
    fn test_unchallenged_shotenko_wins() {
        let mut round = shotenko_round(&[Card::club(13), Card::spade(13)]);
        round.submit_intent(p(1), Intent::Declare).unwrap();
        round.submit_intent(p(2), Intent::Draw).unwrap();
        assert_eq!(round.phase(), Phase::Challenge);
        round.submit_intent(p(0), Intent::Pass).unwrap();

        let result = round.snapshot().result.clone().unwrap();
        assert_eq!(result.outcome, Outcome::Shotenko { winner: p(1) });
        assert_eq!(result.losers, vec![p(0), p(2)]);
        assert_eq!(round.snapshot().dotenko_winner, Some(p(1)));
    }

    #[test]
    fn test_qualifying_contest_overturns() {
        // Seat 2 draws a 6: 1 + 2 + 6 = 9.
        let mut round = shotenko_round(&[Card::heart(6)]);
        round.submit_intent(p(1), Intent::Declare).unwrap();
        round.submit_intent(p(2), Intent::Draw).unwrap();
        assert_eq!(round.snapshot().challenge_participants, vec![p(2)]);
        round.submit_intent(p(0), Intent::Pass).unwrap();

        let state = round.snapshot();
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.outcome, Outcome::ShotenkoOverturned { claimant: p(1), contester: p(2) });
        assert_eq!(result.losers, vec![p(1)]);
        assert_eq!(result.winners, vec![p(0), p(2)]);
        assert_eq!(state.dotenko_winner, Some(p(2)));
    }

    #[test]
    fn test_challenge_rejects_other_intents() {
        let mut round = shotenko_round(&[Card::heart(6)]);
        round.submit_intent(p(1), Intent::Declare).unwrap();

        let err = round.submit_intent(p(2), Intent::Declare).unwrap_err();
        assert!(matches!(
            err,
            EngineError::StaleAction { reason: StaleReason::Phase(Phase::Challenge), .. }
        ));
        let err = round.submit_intent(p(1), Intent::Draw).unwrap_err();
        assert!(err.is_stale());

        round.submit_intent(p(2), Intent::Pass).unwrap();
        let err = round.submit_intent(p(2), Intent::Draw).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(&IllegalReason::AlreadyChallenged));
    }
}
