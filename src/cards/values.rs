//! Hand-value resolution.
//!
//! A card may contribute one of several integers to a hand total. The
//! mapping is configuration, not a property of the card: by default rank n
//! is worth n and a joker is worth -1, 0 or 1.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use super::card::{Card, Rank};

/// The integers one card may count as, in ascending order.
pub type Values = SmallVec<[i32; 2]>;

/// Per-rank and joker value sets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueTable {
    /// Index 0 is the ace.
    ranks: Vec<Values>,
    joker: Values,
}

impl Default for ValueTable {
    fn default() -> Self {
        Self {
            ranks: Rank::all().map(|r| smallvec![i32::from(r.number())]).collect(),
            joker: smallvec![-1, 0, 1],
        }
    }
}

impl ValueTable {
    /// Replace the value set of one rank.
    ///
    /// ```
    /// use dotenko::cards::{Card, Rank, ValueTable};
    ///
    /// let table = ValueTable::default().with_rank_values(Rank::of(1), &[1, 11]);
    /// assert_eq!(table.values(&Card::spade(1)), &[1, 11]);
    /// ```
    #[must_use]
    pub fn with_rank_values(mut self, rank: Rank, values: &[i32]) -> Self {
        self.ranks[usize::from(rank.number() - 1)] = normalized(values);
        self
    }

    #[must_use]
    pub fn with_joker_values(mut self, values: &[i32]) -> Self {
        self.joker = normalized(values);
        self
    }

    /// The values `card` may count as.
    #[must_use]
    pub fn values(&self, card: &Card) -> &[i32] {
        match card.rank() {
            Some(rank) => self
                .ranks
                .get(usize::from(rank.number() - 1))
                .map(|v| v.as_slice())
                .unwrap_or(&[]),
            None => &self.joker,
        }
    }

    /// Two ranked cards match by value when their value sets intersect.
    /// Jokers never match by value; they are wild through a separate rule.
    #[must_use]
    pub fn shares_value(&self, a: &Card, b: &Card) -> bool {
        if a.is_joker() || b.is_joker() {
            return false;
        }
        let theirs = self.values(b);
        self.values(a).iter().any(|v| theirs.contains(v))
    }

    /// Ranks whose value set is empty; a usable table has none.
    pub fn empty_ranks(&self) -> impl Iterator<Item = Rank> + '_ {
        Rank::all().filter(move |r| {
            self.ranks
                .get(usize::from(r.number() - 1))
                .map_or(true, |v| v.is_empty())
        })
    }

    #[must_use]
    pub fn joker_values(&self) -> &[i32] {
        &self.joker
    }
}

fn normalized(values: &[i32]) -> Values {
    let mut out: Values = values.iter().copied().collect();
    out.sort_unstable();
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::JokerColor;

    #[test]
    fn test_default_values() {
        let table = ValueTable::default();
        assert_eq!(table.values(&Card::heart(1)), &[1]);
        assert_eq!(table.values(&Card::club(13)), &[13]);
        assert_eq!(table.values(&Card::joker(JokerColor::Red)), &[-1, 0, 1]);
        assert_eq!(table.empty_ranks().count(), 0);
    }

    #[test]
    fn test_values_are_sorted_and_deduped() {
        let table = ValueTable::default().with_rank_values(Rank::of(1), &[11, 1, 11]);
        assert_eq!(table.values(&Card::diamond(1)), &[1, 11]);
    }

    #[test]
    fn test_shares_value() {
        let table = ValueTable::default().with_rank_values(Rank::of(1), &[1, 11]);
        assert!(table.shares_value(&Card::spade(7), &Card::heart(7)));
        assert!(!table.shares_value(&Card::spade(7), &Card::heart(8)));
        assert!(table.shares_value(&Card::spade(1), &Card::club(11)));
        assert!(!table.shares_value(&Card::joker(JokerColor::Black), &Card::club(1)));
    }

    #[test]
    fn test_empty_rank_detected() {
        let table = ValueTable::default().with_rank_values(Rank::of(5), &[]);
        assert_eq!(table.empty_ranks().collect::<Vec<_>>(), vec![Rank::of(5)]);
    }
}
