//! Legality engine.
//!
//! Pure functions over cards, hands and the value table. The round machine
//! and the bot decision engine both go through these, so a bot proposal and
//! a human intent are judged by the same code.

use rustc_hash::FxHashSet;

use crate::cards::{Card, CardSet, Hand, ValueTable};
use crate::core::config::WinCondition;
use crate::core::error::IllegalReason;
use crate::core::player::PlayerId;

/// Whether one card may go on `field_top`: a shared value, a shared suit, or
/// a joker on either side.
#[must_use]
pub fn card_matches(card: &Card, field_top: &Card, values: &ValueTable) -> bool {
    card.is_joker()
        || field_top.is_joker()
        || card.suit() == field_top.suit()
        || values.shares_value(card, field_top)
}

/// Decide whether `candidate` may be played from `hand` onto `field_top`.
///
/// Checks, in order: the play is non-empty, every card is held, every card
/// matches the field top, and a multi-card play is a single-rank stack
/// (jokers fill in for the rank).
pub fn can_play(
    candidate: &[Card],
    hand: &Hand,
    field_top: &Card,
    values: &ValueTable,
) -> Result<(), IllegalReason> {
    if candidate.is_empty() {
        return Err(IllegalReason::NoCards);
    }
    hand.contains_all(candidate).map_err(IllegalReason::NotInHand)?;

    if let Some(card) = candidate.iter().find(|c| !card_matches(c, field_top, values)) {
        return Err(IllegalReason::NoMatch {
            card: *card,
            field_top: *field_top,
        });
    }

    if candidate.len() > 1 {
        let mut ranks = candidate.iter().filter_map(|c| c.rank());
        if let Some(first) = ranks.next() {
            if ranks.any(|r| r != first) {
                return Err(IllegalReason::MixedRanks);
            }
        }
    }
    Ok(())
}

/// Every sum reachable by picking one value per card.
///
/// An empty hand totals `{0}`.
#[must_use]
pub fn hand_totals(cards: &[Card], values: &ValueTable) -> FxHashSet<i32> {
    let mut totals = FxHashSet::default();
    totals.insert(0);
    for card in cards {
        let mut next = FxHashSet::default();
        for total in &totals {
            for value in values.values(card) {
                next.insert(total + value);
            }
        }
        totals = next;
    }
    totals
}

/// Whether some reachable total satisfies `condition` against `field_top`.
#[must_use]
pub fn satisfies_win_condition(
    totals: &FxHashSet<i32>,
    condition: WinCondition,
    field_top: &Card,
    values: &ValueTable,
) -> bool {
    match condition {
        WinCondition::MatchFieldValue => values.values(field_top).iter().any(|v| totals.contains(v)),
        WinCondition::MultipleOfTen => totals.iter().any(|&t| t > 0 && t % 10 == 0),
    }
}

/// The field situation a declaration is judged against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeclareContext {
    pub field_top: Card,
    /// `None` while the starter is on top.
    pub top_owner: Option<PlayerId>,
    pub declarant: PlayerId,
    /// Whether the round is accepting declarations at all.
    pub window_open: bool,
}

/// Decide whether `hand` may declare dotenko in `ctx`.
pub fn check_declaration(
    hand: &[Card],
    ctx: &DeclareContext,
    condition: WinCondition,
    values: &ValueTable,
) -> Result<(), IllegalReason> {
    if !ctx.window_open || hand.is_empty() {
        return Err(IllegalReason::NotDotenko);
    }
    if ctx.top_owner == Some(ctx.declarant) {
        return Err(IllegalReason::OwnCard);
    }
    let totals = hand_totals(hand, values);
    if satisfies_win_condition(&totals, condition, &ctx.field_top, values) {
        Ok(())
    } else {
        Err(IllegalReason::NotDotenko)
    }
}

#[must_use]
pub fn can_declare_dotenko(
    hand: &[Card],
    ctx: &DeclareContext,
    condition: WinCondition,
    values: &ValueTable,
) -> bool {
    check_declaration(hand, ctx, condition, values).is_ok()
}

/// Every selection of 1 to `max_cards` distinct hand positions, singles
/// first, in hand order. Duplicate card selections appear once.
#[must_use]
pub fn candidate_sets(hand: &[Card], max_cards: usize) -> Vec<CardSet> {
    let mut out: Vec<CardSet> = Vec::new();
    let mut picked: Vec<usize> = Vec::with_capacity(max_cards);
    for size in 1..=max_cards.min(hand.len()) {
        collect_combinations(hand, size, 0, &mut picked, &mut out);
    }
    out
}

fn collect_combinations(
    hand: &[Card],
    size: usize,
    start: usize,
    picked: &mut Vec<usize>,
    out: &mut Vec<CardSet>,
) {
    if picked.len() == size {
        let set: CardSet = picked.iter().map(|&i| hand[i]).collect();
        if !out.contains(&set) {
            out.push(set);
        }
        return;
    }
    for i in start..hand.len() {
        picked.push(i);
        collect_combinations(hand, size, i + 1, picked, out);
        picked.pop();
    }
}
