//! Bot decision policy.
//!
//! Stateless: one call reads a `BotView` and returns at most one
//! `BotAction`. Declarations come first, then the best-scoring play, then
//! draw, burst or pass.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardSet, Hand};
use crate::core::action::Intent;
use crate::core::player::PlayerId;
use crate::core::state::Phase;
use crate::rules::{DeclareContext, RuleOracle};

/// Largest play a bot considers.
const MAX_BOT_PLAY: usize = 2;

/// What a bot sees: the same information the human UI shows that player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotView {
    pub player: PlayerId,
    pub phase: Phase,
    pub is_my_turn: bool,
    pub hand: Hand,
    pub field_top: Option<Card>,
    pub top_owner: Option<PlayerId>,
    pub deck_count: usize,
    /// Whether a draw is open to this player right now.
    pub can_draw: bool,
    pub has_drawn: bool,
    pub max_hand_size: usize,
    /// In a challenge, whether this player still owes a draw or decline.
    pub challenge_pending: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BotAction {
    DeclareDotenko,
    PlayCards(CardSet),
    DrawCard,
    Pass,
    Burst,
}

impl From<BotAction> for Intent {
    fn from(action: BotAction) -> Self {
        match action {
            BotAction::DeclareDotenko => Intent::Declare,
            BotAction::PlayCards(cards) => Intent::Play(cards),
            BotAction::DrawCard => Intent::Draw,
            BotAction::Pass => Intent::Pass,
            BotAction::Burst => Intent::Burst,
        }
    }
}

/// Choose an action, or `None` when the bot has nothing to do.
///
/// ```
/// use dotenko::bot::{decide, BotAction, BotView};
/// use dotenko::cards::{Card, Hand};
/// use dotenko::core::{Phase, PlayerId};
/// use dotenko::rules::Referee;
///
/// let view = BotView {
///     player: PlayerId::new(1),
///     phase: Phase::Playing,
///     is_my_turn: true,
///     hand: Hand::from_cards(&[Card::heart(2), Card::club(13)]),
///     field_top: Some(Card::club(7)),
///     top_owner: Some(PlayerId::new(0)),
///     deck_count: 30,
///     can_draw: true,
///     has_drawn: false,
///     max_hand_size: 7,
///     challenge_pending: false,
/// };
/// let action = decide(&view, &Referee::default());
/// assert_eq!(action, Some(BotAction::PlayCards([Card::club(13)].into_iter().collect())));
/// ```
#[must_use]
pub fn decide(view: &BotView, oracle: &dyn RuleOracle) -> Option<BotAction> {
    match view.phase {
        Phase::Challenge => return decide_challenge(view),
        Phase::Playing => {}
        _ => return None,
    }
    let top = view.field_top?;

    let ctx = DeclareContext {
        field_top: top,
        top_owner: view.top_owner,
        declarant: view.player,
        window_open: true,
    };
    if oracle.can_declare_dotenko(view.hand.cards(), &ctx) {
        return Some(BotAction::DeclareDotenko);
    }
    if !view.is_my_turn {
        return None;
    }

    if let Some(play) = best_play(&view.hand, &top, oracle) {
        return Some(BotAction::PlayCards(play));
    }
    if view.can_draw {
        return Some(BotAction::DrawCard);
    }
    if view.hand.len() >= view.max_hand_size {
        return Some(BotAction::Burst);
    }
    Some(BotAction::Pass)
}

/// Contest every shotenko claim while there is room to draw.
fn decide_challenge(view: &BotView) -> Option<BotAction> {
    if !view.challenge_pending {
        return None;
    }
    if view.hand.len() < view.max_hand_size {
        Some(BotAction::DrawCard)
    } else {
        Some(BotAction::Pass)
    }
}

/// Highest-scoring legal single or pair; the first found wins ties.
#[must_use]
pub fn best_play(hand: &Hand, field_top: &Card, oracle: &dyn RuleOracle) -> Option<CardSet> {
    let mut best: Option<(i32, CardSet)> = None;
    for play in oracle.legal_plays(hand, field_top, MAX_BOT_PLAY) {
        let score = score_play(&play, field_top, oracle);
        if best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, play));
        }
    }
    best.map(|(_, play)| play)
}

/// Heuristic value of a play: matching by value beats matching by suit,
/// jokers are held back, high cards go first, singles beat close stacks.
#[must_use]
pub fn score_play(play: &[Card], field_top: &Card, oracle: &dyn RuleOracle) -> i32 {
    let mut score = 10;
    if play.iter().any(|c| oracle.matches_by_value(c, field_top)) {
        score += 100;
    }
    if play.iter().any(|c| c.suit() == field_top.suit()) {
        score += 50;
    }
    if play.iter().any(|c| c.is_joker()) {
        score -= 10;
    }
    score += play
        .iter()
        .filter_map(|c| c.face_value())
        .map(i32::from)
        .sum::<i32>();
    if play.len() > 1 {
        score -= 5;
    }
    score
}
