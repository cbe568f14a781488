//! The round state machine.
//!
//! `Round` owns the live `RoundState` and is the only code that mutates it.
//! Every intent goes through `submit_intent`, which validates against the
//! current phase and rules before touching anything, records the accepted
//! intent, and re-checks card accounting afterwards.
//!
//! ## Phase flow
//!
//! ```text
//! Waiting → Dealing → Playing ──declare──→ DotenkoProcessing ──→ Settling → Finished
//!                        │                        │ (starter on top)
//!                        │                        └──→ Challenge ──→ Settling
//!                        └──burst / exhausted──────────────────────→ Settling
//! ```

use tracing::{debug, error, info};

use super::event::{Applied, RoundEvent};
use super::layout::RoundLayout;
use crate::bot::BotView;
use crate::cards::{Card, Deck, FieldStack};
use crate::core::action::{ActionRecord, Intent};
use crate::core::config::GameRuleConfig;
use crate::core::error::{EngineError, IllegalReason, StaleReason};
use crate::core::player::{PlayerId, PlayerMap};
use crate::core::rng::GameRng;
use crate::core::state::{Phase, RoundState};
use crate::rules::{DeclareContext, Referee, RuleOracle};
use crate::scoring::{self, Outcome, RateTracker, SettlementInput};

/// One round of Dotenko.
#[derive(Clone, Debug)]
pub struct Round {
    state: RoundState,
    referee: Referee,
    config: GameRuleConfig,
    /// Deck stream; shuffles and reshuffles only.
    rng: GameRng,
    /// Sorted full card set for accounting checks.
    full_set: Vec<Card>,
    halted: Option<EngineError>,
}

impl Round {
    /// A shuffled round waiting to be dealt.
    ///
    /// `scores` carries cumulative scores in; its length is the seat count.
    pub fn new(
        config: GameRuleConfig,
        scores: &PlayerMap<i64>,
        first: PlayerId,
        rng: &GameRng,
    ) -> Result<Self, EngineError> {
        config.validate(scores.player_count())?;
        let mut rng = rng.for_context("deck");
        let deck = Deck::build(config.joker_count, config.deck_cycle_limit, &mut rng);
        let mut state = RoundState::new(deck, scores, first);
        apply_standings(&mut state);
        Ok(Self::assemble(state, config, rng))
    }

    /// A round already in `Playing`, dealt from a fixed layout.
    pub fn with_layout(
        config: GameRuleConfig,
        scores: &PlayerMap<i64>,
        first: PlayerId,
        layout: &RoundLayout,
        rng: &GameRng,
    ) -> Result<Self, EngineError> {
        config.validate(scores.player_count())?;
        if layout.player_count() != scores.player_count() {
            return Err(EngineError::InvalidConfig(format!(
                "layout has {} hands for {} seats",
                layout.player_count(),
                scores.player_count()
            )));
        }
        let mut rng = rng.for_context("deck");
        let laid = layout.build(&config, &mut rng)?;

        let mut state = RoundState::new(laid.deck, scores, first);
        for (player, hand) in laid.hands.into_iter().enumerate() {
            state.players[PlayerId::new(player as u8)].hand = hand;
        }
        state.field = laid.field;
        state.rate = RateTracker::start(laid.starter);
        state.phase = Phase::Playing;
        state.turn_number = 1;
        apply_standings(&mut state);

        let round = Self::assemble(state, config, rng);
        round.verify_card_accounting()?;
        Ok(round)
    }

    fn assemble(state: RoundState, config: GameRuleConfig, rng: GameRng) -> Self {
        let mut full_set = Card::full_set(config.joker_count);
        full_set.sort_unstable();
        Self {
            state,
            referee: Referee::from_config(&config),
            config,
            rng,
            full_set,
            halted: None,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Borrow the live state.
    #[must_use]
    pub fn snapshot(&self) -> &RoundState {
        &self.state
    }

    /// Owned, read-only copy of the live state. O(1) for the deck and field.
    #[must_use]
    pub fn current_snapshot(&self) -> RoundState {
        self.state.clone()
    }

    #[must_use]
    pub fn config(&self) -> &GameRuleConfig {
        &self.config
    }

    #[must_use]
    pub fn referee(&self) -> &Referee {
        &self.referee
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.state.player_count()
    }

    /// The fatal error that stopped this round, if any.
    #[must_use]
    pub fn halted(&self) -> Option<&EngineError> {
        self.halted.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.phase.is_terminal()
    }

    fn is_seated(&self, player: PlayerId) -> bool {
        player.index() < self.player_count()
    }

    /// Whether `player` could declare right now.
    #[must_use]
    pub fn is_dotenko_eligible(&self, player: PlayerId) -> bool {
        if !self.is_seated(player) {
            return false;
        }
        self.declare_context(player)
            .is_some_and(|ctx| self.referee.can_declare_dotenko(self.state.hand(player).cards(), &ctx))
    }

    /// Whether a draw is open to `player` in the turn loop.
    #[must_use]
    pub fn draw_allowed(&self, player: PlayerId) -> bool {
        self.is_seated(player)
            && self.state.phase == Phase::Playing
            && self.state.is_current(player)
            && !self.state.players[player].has_drawn_this_turn
            && self.state.hand(player).len() < self.config.max_hand_size
    }

    /// Check card conservation and the per-player bounds.
    pub fn verify_card_accounting(&self) -> Result<(), EngineError> {
        self.state.verify(&self.full_set, self.config.max_hand_size)
    }

    /// What `player` is shown, in the shape the bot policy consumes.
    /// `None` for a seat not at this table.
    #[must_use]
    pub fn bot_view(&self, player: PlayerId) -> Option<BotView> {
        if !self.is_seated(player) {
            return None;
        }
        let state = &self.state;
        Some(BotView {
            player,
            phase: state.phase,
            is_my_turn: state.phase == Phase::Playing && state.is_current(player),
            hand: state.hand(player).clone(),
            field_top: state.field_top(),
            top_owner: state.field.top_owner(),
            deck_count: state.deck.len(),
            can_draw: self.draw_allowed(player),
            has_drawn: state.players[player].has_drawn_this_turn,
            max_hand_size: self.config.max_hand_size,
            challenge_pending: state.phase == Phase::Challenge && state.challenge_pending().any(|p| p == player),
        })
    }

    /// Every intent `player` could submit right now without error.
    #[must_use]
    pub fn legal_intents(&self, player: PlayerId) -> Vec<Intent> {
        if self.halted.is_some() || !self.is_seated(player) {
            return Vec::new();
        }
        let mut candidates = vec![Intent::Declare, Intent::Draw, Intent::Pass, Intent::Burst];
        if self.state.phase == Phase::Playing && self.state.is_current(player) {
            if let Some(top) = self.state.field_top() {
                let hand = self.state.hand(player);
                candidates.extend(
                    self.referee
                        .legal_plays(hand, &top, hand.len())
                        .into_iter()
                        .map(Intent::Play),
                );
            }
        }
        candidates
            .into_iter()
            .filter(|intent| self.validate(player, intent).is_ok())
            .collect()
    }

    // === Transitions ===

    /// Deal the initial hands, flip the starter and enter `Playing`.
    pub fn deal(&mut self) -> Result<Applied, EngineError> {
        if let Some(err) = &self.halted {
            return Err(err.clone());
        }
        if self.state.phase != Phase::Waiting {
            return Err(EngineError::stale(self.state.current_turn, StaleReason::Phase(self.state.phase)));
        }

        let mut events = Vec::new();
        self.set_phase(Phase::Dealing, &mut events);

        let first = self.state.current_turn;
        let count = self.player_count();
        for _ in 0..self.config.initial_hand_size {
            for offset in 0..count {
                let seat = PlayerId::new(((first.index() + offset) % count) as u8);
                let card = self.state.deck.draw()?;
                self.state.players[seat].hand.push(card);
            }
        }
        let starter = self.state.deck.draw()?;
        self.state.field = FieldStack::new(starter);
        self.state.rate = RateTracker::start(starter);
        self.state.turn_number = 1;
        self.state.version += 1;
        events.push(RoundEvent::Dealt { starter, first });

        self.set_phase(Phase::Playing, &mut events);
        events.push(RoundEvent::TurnChanged {
            player: first,
            turn: self.state.turn_number,
        });
        self.check_invariants()?;
        Ok(Applied { events })
    }

    /// Apply one intent from `player`.
    ///
    /// Rejections leave the state untouched: `IllegalAction` for rule
    /// violations, `StaleAction` for intents the phase or turn no longer
    /// accepts. An `InvariantViolation` halts the round for good.
    pub fn submit_intent(&mut self, player: PlayerId, intent: Intent) -> Result<Applied, EngineError> {
        if let Some(err) = &self.halted {
            return Err(err.clone());
        }
        if let Err(err) = self.validate(player, &intent) {
            match &err {
                EngineError::StaleAction { reason, .. } => {
                    debug!(player = %player, intent = intent.kind(), reason = %reason, "stale intent dropped");
                }
                other => {
                    debug!(player = %player, intent = intent.kind(), error = %other, "intent rejected");
                }
            }
            return Err(err);
        }

        let turn = self.state.turn_number;
        let mut events = Vec::new();
        match (self.state.phase, &intent) {
            (Phase::Playing, Intent::Declare) => self.apply_declare(player, &mut events)?,
            (Phase::Playing, Intent::Play(cards)) => self.apply_play(player, cards, &mut events)?,
            (Phase::Playing, Intent::Draw) => self.apply_draw(player, &mut events)?,
            (Phase::Playing, Intent::Pass) => self.apply_pass(player, &mut events)?,
            (Phase::Playing, Intent::Burst) => self.resolve_burst(player, &mut events)?,
            (Phase::Challenge, Intent::Draw) => self.apply_challenge_draw(player, &mut events)?,
            (Phase::Challenge, Intent::Pass) => self.apply_challenge_decline(player, &mut events)?,
            (phase, _) => {
                return Err(EngineError::InvariantViolation(format!(
                    "validated {} in phase {:?} has no transition",
                    intent.kind(),
                    phase
                )))
            }
        }

        let sequence = self.state.history.len() as u32;
        self.state.history.push_back(ActionRecord {
            player,
            intent,
            turn,
            sequence,
        });
        self.state.version += 1;
        self.check_invariants()?;
        Ok(Applied { events })
    }

    /// Every check an intent must pass, without side effects.
    fn validate(&self, player: PlayerId, intent: &Intent) -> Result<(), EngineError> {
        if !self.is_seated(player) {
            return Err(IllegalReason::UnknownPlayer(player).into());
        }
        let state = &self.state;
        match state.phase {
            Phase::Playing => {}
            Phase::Challenge => return self.validate_challenge(player, intent),
            phase => return Err(EngineError::stale(player, StaleReason::Phase(phase))),
        }

        if let Intent::Declare = intent {
            let ctx = self.declare_context(player).ok_or_else(|| self.missing_top())?;
            return Ok(self.referee.check_declaration(state.hand(player).cards(), &ctx)?);
        }

        if !state.is_current(player) {
            return Err(EngineError::stale(player, StaleReason::NotYourTurn));
        }
        let top = state.field_top().ok_or_else(|| self.missing_top())?;
        let hand = state.hand(player);
        let max = self.config.max_hand_size;

        match intent {
            Intent::Declare => Ok(()),
            Intent::Play(cards) => Ok(self.referee.can_play(cards, hand, &top)?),
            Intent::Draw => {
                if state.players[player].has_drawn_this_turn {
                    Err(IllegalReason::AlreadyDrawn.into())
                } else if hand.len() >= max {
                    Err(IllegalReason::HandFull(hand.len()).into())
                } else {
                    Ok(())
                }
            }
            Intent::Pass => {
                if self.referee.has_legal_play(hand, &top) {
                    Err(IllegalReason::PlayAvailable.into())
                } else if hand.len() >= max {
                    Err(IllegalReason::MustBurst.into())
                } else if !state.players[player].has_drawn_this_turn && self.deck_can_supply() {
                    Err(IllegalReason::MustDraw.into())
                } else {
                    Ok(())
                }
            }
            Intent::Burst => {
                if hand.len() < max || self.referee.has_legal_play(hand, &top) {
                    Err(IllegalReason::BurstNotForced.into())
                } else {
                    Ok(())
                }
            }
        }
    }

    fn declare_context(&self, player: PlayerId) -> Option<DeclareContext> {
        Some(DeclareContext {
            field_top: self.state.field_top()?,
            top_owner: self.state.field.top_owner(),
            declarant: player,
            window_open: self.state.phase == Phase::Playing,
        })
    }

    fn missing_top(&self) -> EngineError {
        EngineError::InvariantViolation(format!("no field card in phase {:?}", self.state.phase))
    }

    /// Whether a draw can produce a card, directly or through a reshuffle.
    fn deck_can_supply(&self) -> bool {
        !self.state.deck.is_empty() || (self.state.deck.can_reshuffle() && self.state.field.len() > 1)
    }

    fn apply_declare(&mut self, player: PlayerId, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        let owner = self.state.field.top_owner();
        events.push(RoundEvent::Declared {
            player,
            shotenko: owner.is_none(),
        });
        self.set_phase(Phase::DotenkoProcessing, events);

        match owner {
            None => {
                info!(player = %player, "shotenko claimed");
                self.open_challenge(player, events);
                Ok(())
            }
            Some(loser) => {
                info!(player = %player, loser = %loser, "dotenko declared");
                self.state.dotenko_winner = Some(player);
                self.settle(Outcome::Dotenko { winner: player, loser }, events)
            }
        }
    }

    fn apply_play(&mut self, player: PlayerId, cards: &[Card], events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        self.state.players[player]
            .hand
            .remove_all(cards)
            .map_err(|card| EngineError::InvariantViolation(format!("validated play lost {}", card)))?;
        self.state.field.push_play(player, cards);
        events.push(RoundEvent::CardsPlayed {
            player,
            cards: cards.iter().copied().collect(),
        });

        if self
            .state
            .rate
            .record_play(cards, self.config.up_rate_threshold, self.config.rate_step)
        {
            let multiplier = self.state.rate.multiplier();
            info!(multiplier, "rate up");
            events.push(RoundEvent::RateUp { multiplier });
        }
        self.advance_turn(events);
        Ok(())
    }

    fn apply_draw(&mut self, player: PlayerId, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        let Some(card) = self.draw_card(events)? else {
            return self.end_exhausted(events);
        };
        self.state.players[player].hand.push(card);
        self.state.players[player].has_drawn_this_turn = true;
        events.push(RoundEvent::CardDrawn { player, card });

        let hand = self.state.hand(player);
        let forced = hand.len() >= self.config.max_hand_size
            && self
                .state
                .field_top()
                .is_some_and(|top| !self.referee.has_legal_play(hand, &top))
            && !self.is_dotenko_eligible(player);
        if forced {
            return self.resolve_burst(player, events);
        }
        Ok(())
    }

    fn apply_pass(&mut self, player: PlayerId, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        if !self.deck_can_supply() {
            return self.end_exhausted(events);
        }
        events.push(RoundEvent::Passed { player });
        self.advance_turn(events);
        Ok(())
    }

    /// Take the top card, refilling from the field first if the deck is empty.
    /// `None` when no card can be had under the cycle limit.
    pub(super) fn draw_card(&mut self, events: &mut Vec<RoundEvent>) -> Result<Option<Card>, EngineError> {
        if self.state.deck.is_empty() {
            if !self.deck_can_supply() {
                return Ok(None);
            }
            let recycled = self.state.field.take_recyclable();
            let count = recycled.len();
            match self.state.deck.reshuffle(recycled, &mut self.rng) {
                Ok(cycle) => {
                    debug!(cycle, cards = count, "deck reshuffled from field");
                    events.push(RoundEvent::DeckReshuffled { cycle, cards: count });
                }
                Err((err, back)) => {
                    debug!(error = %err, "reshuffle refused");
                    self.state.field.restore_underneath(back);
                    return Ok(None);
                }
            }
        }
        self.state.deck.draw().map(Some)
    }

    fn end_exhausted(&mut self, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        info!(
            cycles = self.state.deck.cycles_used(),
            "deck exhausted, round ends without a winner"
        );
        events.push(RoundEvent::DeckExhausted);
        self.settle(Outcome::Exhausted, events)
    }

    fn resolve_burst(&mut self, player: PlayerId, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        info!(player = %player, hand = self.state.hand(player).len(), "burst");
        self.state.burst_player = Some(player);
        events.push(RoundEvent::Burst { player });
        self.settle(Outcome::Burst { player }, events)
    }

    fn advance_turn(&mut self, events: &mut Vec<RoundEvent>) {
        let current = self.state.current_turn;
        self.state.players[current].has_drawn_this_turn = false;
        self.state.current_turn = current.next(self.player_count());
        self.state.turn_number += 1;
        events.push(RoundEvent::TurnChanged {
            player: self.state.current_turn,
            turn: self.state.turn_number,
        });
    }

    /// Price the round, apply it to scores and finish.
    pub(super) fn settle(&mut self, outcome: Outcome, events: &mut Vec<RoundEvent>) -> Result<(), EngineError> {
        self.set_phase(Phase::Settling, events);
        for player in self.state.players.iter_mut().map(|(_, p)| p) {
            player.has_drawn_this_turn = false;
        }

        let settlement_card = self
            .state
            .deck
            .settlement_card()
            .or_else(|| self.state.field.settlement_card());
        let result = scoring::settle(&SettlementInput {
            outcome,
            player_count: self.player_count(),
            multiplier: self.state.rate.multiplier(),
            rate_cards: self.state.rate.rate_cards(),
            settlement_card,
            base_rate: self.config.base_rate,
            max_score: self.config.max_score,
        });

        let mut scores = PlayerMap::new(self.player_count(), |p| self.state.players[p].score);
        result.apply(&mut scores);
        for (id, player) in self.state.players.iter_mut() {
            player.score = scores[id];
        }
        apply_standings(&mut self.state);

        info!(
            outcome = ?result.outcome,
            transfer = result.transfer,
            multiplier = result.multiplier,
            "round settled"
        );
        events.push(RoundEvent::ScoreSettled(result.clone()));
        self.state.result = Some(result);
        self.set_phase(Phase::Finished, events);
        Ok(())
    }

    pub(super) fn set_phase(&mut self, to: Phase, events: &mut Vec<RoundEvent>) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        info!(from = ?from, to = ?to, "phase change");
        self.state.phase = to;
        events.push(RoundEvent::PhaseChanged { from, to });
    }

    pub(super) fn state_mut(&mut self) -> &mut RoundState {
        &mut self.state
    }

    fn check_invariants(&mut self) -> Result<(), EngineError> {
        if let Err(err) = self.verify_card_accounting() {
            error!(error = %err, version = self.state.version, "round halted");
            self.halted = Some(err.clone());
            return Err(err);
        }
        Ok(())
    }
}

fn apply_standings(state: &mut RoundState) {
    let scores = PlayerMap::new(state.player_count(), |p| state.players[p].score);
    let ranks = scoring::standings(&scores);
    for (id, player) in state.players.iter_mut() {
        player.rank = ranks[id];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(players: usize, seed: u64) -> Round {
        let scores = PlayerMap::with_value(players, 0);
        Round::new(GameRuleConfig::default(), &scores, PlayerId::new(0), &GameRng::new(seed)).unwrap()
    }

    fn laid(layout: RoundLayout, config: GameRuleConfig) -> Round {
        let scores = PlayerMap::with_value(layout.player_count(), 0);
        Round::with_layout(config, &scores, PlayerId::new(0), &layout, &GameRng::new(1)).unwrap()
    }

    #[test]
    fn test_deal() {
        let mut round = fresh(4, 42);
        assert_eq!(round.phase(), Phase::Waiting);

        let applied = round.deal().unwrap();
        assert_eq!(round.phase(), Phase::Playing);
        assert!(applied.changes_field());
        for (_, player) in round.snapshot().players.iter() {
            assert_eq!(player.hand.len(), 2);
        }
        assert_eq!(round.snapshot().field.len(), 1);
        assert_eq!(round.snapshot().deck.len(), 54 - 9);
        assert!(round.verify_card_accounting().is_ok());
    }

    #[test]
    fn test_deal_twice_is_stale() {
        let mut round = fresh(2, 1);
        round.deal().unwrap();
        assert!(round.deal().unwrap_err().is_stale());
    }

    #[test]
    fn test_intent_before_deal_is_stale() {
        let mut round = fresh(2, 1);
        let err = round.submit_intent(PlayerId::new(0), Intent::Draw).unwrap_err();
        assert!(err.is_stale());
    }

    #[test]
    fn test_unknown_player() {
        let mut round = fresh(2, 1);
        round.deal().unwrap();
        let err = round.submit_intent(PlayerId::new(5), Intent::Draw).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(&IllegalReason::UnknownPlayer(PlayerId::new(5))));
    }

    #[test]
    fn test_play_advances_turn() {
        let layout = RoundLayout::new(
            vec![vec![Card::club(5), Card::diamond(13)], vec![Card::heart(2), Card::heart(3)]],
            Card::club(9),
        );
        let mut round = laid(layout, GameRuleConfig::default());
        let p0 = PlayerId::new(0);

        round.submit_intent(p0, Intent::play(&[Card::club(5)])).unwrap();
        let state = round.snapshot();
        assert_eq!(state.field_top(), Some(Card::club(5)));
        assert_eq!(state.field.top_owner(), Some(p0));
        assert_eq!(state.current_turn, PlayerId::new(1));
        assert_eq!(state.turn_number, 2);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].turn, 1);
    }

    #[test]
    fn test_draw_once_per_turn() {
        let layout = RoundLayout::new(
            vec![vec![Card::heart(2), Card::heart(4)], vec![Card::spade(1), Card::spade(2)]],
            Card::club(9),
        )
        .with_deck_top(&[Card::diamond(6)]);
        let mut round = laid(layout, GameRuleConfig::default());
        let p0 = PlayerId::new(0);

        round.submit_intent(p0, Intent::Draw).unwrap();
        assert!(round.snapshot().players[p0].has_drawn_this_turn);
        let err = round.submit_intent(p0, Intent::Draw).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(&IllegalReason::AlreadyDrawn));

        round.submit_intent(p0, Intent::Pass).unwrap();
        assert!(!round.snapshot().players[p0].has_drawn_this_turn);
    }

    #[test]
    fn test_pass_requires_draw_first() {
        let layout = RoundLayout::new(
            vec![vec![Card::heart(2), Card::heart(4)], vec![Card::spade(1), Card::spade(2)]],
            Card::club(9),
        );
        let mut round = laid(layout, GameRuleConfig::default());
        let err = round.submit_intent(PlayerId::new(0), Intent::Pass).unwrap_err();
        assert_eq!(err.illegal_reason(), Some(&IllegalReason::MustDraw));
    }

    #[test]
    fn test_out_of_turn_play_is_stale() {
        let layout = RoundLayout::new(
            vec![vec![Card::heart(2), Card::heart(4)], vec![Card::club(1), Card::spade(2)]],
            Card::club(9),
        );
        let mut round = laid(layout, GameRuleConfig::default());
        let err = round
            .submit_intent(PlayerId::new(1), Intent::play(&[Card::club(1)]))
            .unwrap_err();
        assert!(err.is_stale());
        assert_eq!(round.snapshot().version, 0);
    }

    #[test]
    fn test_dotenko_settles() {
        let layout = RoundLayout::new(
            vec![vec![Card::club(5), Card::diamond(13)], vec![Card::heart(2), Card::heart(3)]],
            Card::club(9),
        )
        .with_deck_bottom(&[Card::spade(4)]);
        let mut round = laid(layout, GameRuleConfig::default());
        let (p0, p1) = (PlayerId::new(0), PlayerId::new(1));

        round.submit_intent(p0, Intent::play(&[Card::club(5)])).unwrap();
        assert!(round.is_dotenko_eligible(p1));
        let applied = round.submit_intent(p1, Intent::Declare).unwrap();

        assert_eq!(applied.final_phase(), Some(Phase::Finished));
        let state = round.snapshot();
        let result = state.result.as_ref().unwrap();
        assert_eq!(result.outcome, Outcome::Dotenko { winner: p1, loser: p0 });
        assert_eq!(result.settlement_card, Some(Card::spade(4)));
        assert_eq!(state.players[p1].score, 4);
        assert_eq!(state.players[p0].score, -4);
        assert_eq!(state.players[p1].rank, 1);
        assert_eq!(state.dotenko_winner, Some(p1));
    }

    #[test]
    fn test_after_finish_everything_is_stale() {
        let layout = RoundLayout::new(
            vec![vec![Card::club(5), Card::diamond(13)], vec![Card::heart(2), Card::heart(3)]],
            Card::club(9),
        );
        let mut round = laid(layout, GameRuleConfig::default());
        round.submit_intent(PlayerId::new(0), Intent::play(&[Card::club(5)])).unwrap();
        round.submit_intent(PlayerId::new(1), Intent::Declare).unwrap();

        let err = round.submit_intent(PlayerId::new(1), Intent::Draw).unwrap_err();
        assert!(matches!(
            err,
            EngineError::StaleAction { reason: StaleReason::Phase(Phase::Finished), .. }
        ));
    }

    #[test]
    fn test_auto_burst_on_full_hand() {
        let config = GameRuleConfig::default().with_hand_sizes(2, 3);
        let layout = RoundLayout::new(
            vec![vec![Card::heart(2), Card::heart(4)], vec![Card::spade(1), Card::spade(2)]],
            Card::club(13),
        )
        .with_deck_top(&[Card::diamond(9)]);
        let mut round = laid(layout, config);
        let p0 = PlayerId::new(0);

        let applied = round.submit_intent(p0, Intent::Draw).unwrap();
        assert!(applied.events.contains(&RoundEvent::Burst { player: p0 }));
        let state = round.snapshot();
        assert_eq!(state.phase, Phase::Finished);
        assert_eq!(state.burst_player, Some(p0));
        assert_eq!(state.result.as_ref().unwrap().losers, vec![p0]);
    }

    #[test]
    fn test_legal_intents() {
        let layout = RoundLayout::new(
            vec![vec![Card::club(5), Card::diamond(13)], vec![Card::heart(2), Card::heart(3)]],
            Card::club(9),
        );
        let round = laid(layout, GameRuleConfig::default());
        let intents = round.legal_intents(PlayerId::new(0));
        assert!(intents.contains(&Intent::Draw));
        assert!(intents.contains(&Intent::play(&[Card::club(5)])));
        assert!(!intents.contains(&Intent::Pass));
        assert!(!intents.contains(&Intent::Declare));

        assert!(round.legal_intents(PlayerId::new(1)).is_empty());
    }

    #[test]
    fn test_queries_ignore_unknown_seats() {
        let mut round = fresh(2, 1);
        round.deal().unwrap();
        let stranger = PlayerId::new(5);
        assert!(!round.is_dotenko_eligible(stranger));
        assert!(!round.draw_allowed(stranger));
        assert!(round.bot_view(stranger).is_none());
        assert!(round.legal_intents(stranger).is_empty());
    }

    /// Losing a card behind the machine's back halts the round. The intent
    /// that exposed it has already been applied when the check runs, so the
    /// halted state includes it; nothing after it is.
    #[test]
    fn test_accounting_failure_halts_the_round() {
        let layout = RoundLayout::new(
            vec![vec![Card::club(5), Card::diamond(13)], vec![Card::heart(2), Card::heart(3)]],
            Card::club(9),
        );
        let mut round = laid(layout, GameRuleConfig::default());
        round.state_mut().deck.draw().unwrap();

        let err = round.submit_intent(PlayerId::new(0), Intent::play(&[Card::club(5)])).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(err, EngineError::InvariantViolation(_)));
        assert_eq!(round.halted(), Some(&err));
        assert_eq!(round.snapshot().field_top(), Some(Card::club(5)));
        let version = round.snapshot().version;

        let again = round.submit_intent(PlayerId::new(1), Intent::Declare).unwrap_err();
        assert_eq!(again, err);
        assert!(round.legal_intents(PlayerId::new(1)).is_empty());
        assert_eq!(round.snapshot().version, version);
    }

    #[test]
    fn test_bot_view_mirrors_state() {
        let layout = RoundLayout::new(
            vec![vec![Card::club(5), Card::diamond(13)], vec![Card::heart(2), Card::heart(3)]],
            Card::club(9),
        );
        let round = laid(layout, GameRuleConfig::default());
        let view = round.bot_view(PlayerId::new(1)).unwrap();
        assert!(!view.is_my_turn);
        assert!(!view.can_draw);
        assert_eq!(view.field_top, Some(Card::club(9)));
        assert_eq!(view.top_owner, None);
        assert_eq!(view.hand.len(), 2);
    }
}
