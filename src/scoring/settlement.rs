//! Round settlement.
//!
//! `transfer = min(base_rate * multiplier * face, max_score)`. Each loser pays
//! `transfer`; the pot is split evenly across winners in seat order and the
//! remainder of the division is not paid out.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::player::{PlayerId, PlayerMap};

/// How a round ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A declaration on a played card; whoever played it pays.
    Dotenko { winner: PlayerId, loser: PlayerId },
    /// A declaration on the starter that survived the challenge.
    Shotenko { winner: PlayerId },
    /// A challenger qualified too; the claimant pays everyone.
    ShotenkoOverturned { claimant: PlayerId, contester: PlayerId },
    /// A full hand with nothing to play; the burster pays everyone.
    Burst { player: PlayerId },
    /// The deck ran out with no reshuffle left. Nobody pays.
    Exhausted,
}

impl Outcome {
    /// Winners and losers in seat order.
    #[must_use]
    pub fn sides(&self, player_count: usize) -> (Vec<PlayerId>, Vec<PlayerId>) {
        let everyone_but = |p: PlayerId| -> Vec<PlayerId> {
            PlayerId::all(player_count).filter(|&o| o != p).collect()
        };
        match *self {
            Outcome::Dotenko { winner, loser } => (vec![winner], vec![loser]),
            Outcome::Shotenko { winner } => (vec![winner], everyone_but(winner)),
            Outcome::ShotenkoOverturned { claimant, .. } => (everyone_but(claimant), vec![claimant]),
            Outcome::Burst { player } => (everyone_but(player), vec![player]),
            Outcome::Exhausted => (Vec::new(), Vec::new()),
        }
    }
}

/// Everything settlement needs, gathered from the round.
#[derive(Clone, Debug)]
pub struct SettlementInput<'a> {
    pub outcome: Outcome,
    pub player_count: usize,
    pub multiplier: u64,
    pub rate_cards: &'a [Card],
    /// Card flipped for the face value; `None` prices at 1.
    pub settlement_card: Option<Card>,
    pub base_rate: u64,
    pub max_score: Option<u64>,
}

/// The settled round, for display and for applying to cumulative scores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub outcome: Outcome,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    pub settlement_card: Option<Card>,
    pub face_value: u64,
    /// Cards of the runs that escalated the rate.
    pub rate_cards: Vec<Card>,
    pub multiplier: u64,
    pub base_rate: u64,
    /// Paid by each loser.
    pub transfer: u64,
    pub pot: u64,
    /// Credited to each winner.
    pub share: u64,
    /// Left over from the even split; not paid to anyone.
    pub remainder: u64,
    /// Per-seat score change.
    pub deltas: PlayerMap<i64>,
}

impl ScoreResult {
    /// Add this round's deltas to cumulative scores.
    pub fn apply(&self, scores: &mut PlayerMap<i64>) {
        for (player, delta) in self.deltas.iter() {
            scores[player] = scores[player].saturating_add(*delta);
        }
    }

    #[must_use]
    pub fn has_winner(&self) -> bool {
        !self.winners.is_empty()
    }
}

/// Price the round and split the pot.
///
/// ```
/// use dotenko::cards::Card;
/// use dotenko::core::PlayerId;
/// use dotenko::scoring::{settle, Outcome, SettlementInput};
///
/// let result = settle(&SettlementInput {
///     outcome: Outcome::Burst { player: PlayerId::new(0) },
///     player_count: 4,
///     multiplier: 2,
///     rate_cards: &[],
///     settlement_card: Some(Card::heart(5)),
///     base_rate: 1,
///     max_score: None,
/// });
/// assert_eq!(result.transfer, 10);
/// assert_eq!(result.share, 3);
/// assert_eq!(result.remainder, 1);
/// ```
#[must_use]
pub fn settle(input: &SettlementInput<'_>) -> ScoreResult {
    let (winners, losers) = input.outcome.sides(input.player_count);
    let face_value = input
        .settlement_card
        .and_then(Card::face_value)
        .map_or(1, u64::from);

    let transfer = if losers.is_empty() {
        0
    } else {
        let raw = input
            .base_rate
            .saturating_mul(input.multiplier)
            .saturating_mul(face_value);
        input.max_score.map_or(raw, |cap| raw.min(cap))
    };

    let pot = transfer.saturating_mul(losers.len() as u64);
    let (share, remainder) = match winners.len() as u64 {
        0 => (0, pot),
        n => (pot / n, pot % n),
    };

    let mut deltas = PlayerMap::with_value(input.player_count, 0i64);
    for &loser in &losers {
        deltas[loser] = deltas[loser].saturating_sub(to_points(transfer));
    }
    for &winner in &winners {
        deltas[winner] = deltas[winner].saturating_add(to_points(share));
    }

    ScoreResult {
        outcome: input.outcome,
        winners,
        losers,
        settlement_card: input.settlement_card,
        face_value,
        rate_cards: input.rate_cards.to_vec(),
        multiplier: input.multiplier,
        base_rate: input.base_rate,
        transfer,
        pot,
        share,
        remainder,
        deltas,
    }
}

fn to_points(amount: u64) -> i64 {
    i64::try_from(amount).unwrap_or(i64::MAX)
}

/// Rank seats by cumulative score: 1 is highest, equal scores share a rank.
///
/// ```
/// use dotenko::core::{PlayerId, PlayerMap};
/// use dotenko::scoring::standings;
///
/// let mut scores = PlayerMap::with_value(3, 0i64);
/// scores[PlayerId::new(0)] = 10;
/// let ranks = standings(&scores);
/// assert_eq!(ranks[PlayerId::new(0)], 1);
/// assert_eq!(ranks[PlayerId::new(1)], 2);
/// assert_eq!(ranks[PlayerId::new(2)], 2);
/// ```
#[must_use]
pub fn standings(scores: &PlayerMap<i64>) -> PlayerMap<u8> {
    PlayerMap::new(scores.player_count(), |player| {
        let ahead = scores.values().filter(|&&s| s > scores[player]).count();
        (ahead + 1) as u8
    })
}
