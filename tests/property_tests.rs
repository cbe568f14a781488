//! Property tests: card conservation over bot-driven rounds and the
//! soundness of bot proposals.

use proptest::prelude::*;

use dotenko::bot::{best_play, decide, BotAction};
use dotenko::cards::{Card, Hand};
use dotenko::core::{GameRng, GameRuleConfig, Intent, Phase, PlayerId, PlayerMap};
use dotenko::round::Round;
use dotenko::rules::{hand_totals, Referee, RuleOracle};

fn any_card() -> impl Strategy<Value = Card> {
    prop::sample::select(Card::full_set(2))
}

fn any_hand() -> impl Strategy<Value = Vec<Card>> {
    prop::sample::subsequence(Card::full_set(2), 1..=7)
}

/// Drive a round with bot decisions for every seat, checking the round
/// after each accepted intent. Returns the number of accepted intents.
fn drive(round: &mut Round, max_steps: usize) -> Result<usize, TestCaseError> {
    let seats = round.player_count();
    let mut steps = 0;
    while !round.is_finished() && steps < max_steps {
        let state = round.snapshot();
        let actor = match state.phase {
            Phase::Challenge => state.challenge_pending().next(),
            Phase::Playing => PlayerId::all(seats)
                .find(|&p| round.is_dotenko_eligible(p))
                .or(Some(state.current_turn)),
            _ => None,
        };
        let Some(actor) = actor else {
            return Err(TestCaseError::fail(format!("nobody can act in {:?}", state.phase)));
        };
        let Some(action) = round.bot_view(actor).and_then(|view| decide(&view, round.referee())) else {
            return Err(TestCaseError::fail(format!("{} has no decision", actor)));
        };

        round
            .submit_intent(actor, Intent::from(action))
            .map_err(|e| TestCaseError::fail(format!("{} rejected: {}", actor, e)))?;
        steps += 1;

        round
            .verify_card_accounting()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        let max = round.config().max_hand_size;
        for player in PlayerId::all(seats) {
            prop_assert!(round.snapshot().hand(player).len() <= max);
        }
    }
    Ok(steps)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every bot-driven round conserves the card set and settles.
    #[test]
    fn prop_bot_rounds_conserve_cards(seed in any::<u64>(), seats in 2usize..=6, jokers in 0u8..=4) {
        let config = GameRuleConfig::default().with_jokers(jokers);
        let scores = PlayerMap::with_value(seats, 0);
        let first = PlayerId::new((seed % seats as u64) as u8);
        let mut round = Round::new(config, &scores, first, &GameRng::new(seed)).unwrap();
        round.deal().unwrap();

        drive(&mut round, 5_000)?;
        prop_assert!(round.is_finished());

        let result = round.snapshot().result.clone().unwrap();
        let paid: i64 = result.deltas.values().sum();
        prop_assert_eq!(paid, -(result.remainder as i64));
    }

    /// Whatever the bot proposes to play is legal.
    #[test]
    fn prop_best_play_is_legal(hand in any_hand(), top in any_card()) {
        let referee = Referee::default();
        let hand = Hand::from_cards(&hand);
        if let Some(play) = best_play(&hand, &top, &referee) {
            prop_assert!(referee.can_play(&play, &hand, &top).is_ok());
            prop_assert!(play.len() <= 2);
        } else {
            prop_assert!(!referee.has_legal_play(&hand, &top));
        }
    }

    /// A bot on its turn never proposes a play the round would refuse.
    #[test]
    fn prop_decision_is_accepted(seed in any::<u64>(), seats in 2usize..=5) {
        let scores = PlayerMap::with_value(seats, 0);
        let mut round = Round::new(GameRuleConfig::default(), &scores, PlayerId::new(0), &GameRng::new(seed)).unwrap();
        round.deal().unwrap();

        let current = round.snapshot().current_turn;
        let action = round.bot_view(current).and_then(|view| decide(&view, round.referee()));
        prop_assert!(action.is_some());
        if let Some(BotAction::PlayCards(cards)) = &action {
            prop_assert!(round.referee().can_play(cards, round.snapshot().hand(current), &round.snapshot().field_top().unwrap()).is_ok());
        }
        prop_assert!(round.submit_intent(current, Intent::from(action.unwrap())).is_ok());
    }

    /// Each joker widens the totals by one either way, and counting every
    /// joker as 0 always reaches the face sum.
    #[test]
    fn prop_hand_totals_bounds(hand in any_hand()) {
        let referee = Referee::default();
        let totals = referee.hand_totals(&hand);
        let jokers = hand.iter().filter(|c| c.is_joker()).count() as u32;
        prop_assert!(!totals.is_empty());
        prop_assert!(totals.len() <= 2 * jokers as usize + 1);

        let plain: i32 = hand.iter().filter_map(|c| c.face_value()).map(i32::from).sum();
        prop_assert!(totals.contains(&plain));
        prop_assert_eq!(totals, hand_totals(&hand, referee.values()));
    }
}
