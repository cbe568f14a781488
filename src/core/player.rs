//! Seat identification, per-seat storage and the round roster.
//!
//! ## PlayerId
//!
//! Engine-internal seat index. Turn order follows seat order.
//!
//! ## PlayerMap
//!
//! Per-seat data backed by a `Vec`, indexed by `PlayerId`.
//!
//! ## Roster
//!
//! Maps seats to the stable ids the outer layer knows players by. The human
//! seat carries the fixed sentinel id [`HUMAN_ID`]; bot ids are opaque.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// External id of the human player.
pub const HUMAN_ID: &str = "human";

/// Seat index, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all seats at a table of `player_count`.
    ///
    /// ```
    /// use dotenko::core::PlayerId;
    ///
    /// let seats: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(seats, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }

    /// The seat after this one, wrapping around the table.
    #[must_use]
    pub fn next(self, player_count: usize) -> PlayerId {
        PlayerId(((self.index() + 1) % player_count) as u8)
    }

    /// All seats in turn order starting after this one (this seat excluded).
    pub fn others_in_order(self, player_count: usize) -> impl Iterator<Item = PlayerId> {
        (1..player_count).map(move |offset| PlayerId(((self.index() + offset) % player_count) as u8))
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use dotenko::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<i64> = PlayerMap::with_value(4, 0);
/// scores[PlayerId::new(2)] += 30;
/// assert_eq!(scores[PlayerId::new(2)], 30);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    /// Create a map with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Iterate over (PlayerId, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data.iter_mut().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Who decides for a seat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Intents arrive from the outer layer through `submit_intent`.
    Human,
    /// Intents are produced by the bot decision engine.
    Bot,
}

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    /// Stable id supplied by the outer layer.
    pub external_id: String,
    pub kind: PlayerKind,
}

/// Ordered list of seats for a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    seats: Vec<Seat>,
}

impl Roster {
    /// One human in seat 0 followed by the given bots.
    ///
    /// ```
    /// use dotenko::core::{PlayerKind, Roster};
    ///
    /// let roster = Roster::human_vs_bots(["cpu-a", "cpu-b"]);
    /// assert_eq!(roster.len(), 3);
    /// assert_eq!(roster.seats()[0].kind, PlayerKind::Human);
    /// ```
    pub fn human_vs_bots<I, S>(bot_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self { seats: Vec::new() };
        roster.push(HUMAN_ID, PlayerKind::Human);
        for id in bot_ids {
            roster.push(id, PlayerKind::Bot);
        }
        roster
    }

    /// Bots only, for simulations.
    pub fn bots<I, S>(bot_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roster = Self { seats: Vec::new() };
        for id in bot_ids {
            roster.push(id, PlayerKind::Bot);
        }
        roster
    }

    fn push(&mut self, external_id: impl Into<String>, kind: PlayerKind) {
        let id = PlayerId::new(self.seats.len() as u8);
        self.seats.push(Seat {
            id,
            external_id: external_id.into(),
            kind,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    #[must_use]
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    #[must_use]
    pub fn is_bot(&self, player: PlayerId) -> bool {
        self.seats
            .get(player.index())
            .is_some_and(|seat| seat.kind == PlayerKind::Bot)
    }

    /// Find a seat by the outer layer's id.
    #[must_use]
    pub fn lookup(&self, external_id: &str) -> Option<PlayerId> {
        self.seats
            .iter()
            .find(|seat| seat.external_id == external_id)
            .map(|seat| seat.id)
    }

    pub fn bot_ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.seats
            .iter()
            .filter(|seat| seat.kind == PlayerKind::Bot)
            .map(|seat| seat.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        assert_eq!(p0.index(), 0);
        assert_eq!(format!("{}", p0), "Seat 0");
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
        assert_eq!(PlayerId::new(0).next(3), PlayerId::new(1));
    }

    #[test]
    fn test_others_in_order() {
        let order: Vec<_> = PlayerId::new(2).others_in_order(4).collect();
        assert_eq!(order, vec![PlayerId::new(3), PlayerId::new(0), PlayerId::new(1)]);
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert_eq!(map.player_count(), 4);
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(3, |p| p.index() as i32);
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs[2], (PlayerId::new(2), &2));
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i64> = PlayerMap::new(2, |p| p.index() as i64 - 5);
        let json = serde_json::to_string(&map).unwrap();
        let back: PlayerMap<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, back);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::with_value(0, 0);
    }

    #[test]
    fn test_roster_lookup() {
        let roster = Roster::human_vs_bots(["cpu-1", "cpu-2", "cpu-3"]);
        assert_eq!(roster.lookup(HUMAN_ID), Some(PlayerId::new(0)));
        assert_eq!(roster.lookup("cpu-3"), Some(PlayerId::new(3)));
        assert_eq!(roster.lookup("nobody"), None);
        assert!(!roster.is_bot(PlayerId::new(0)));
        assert!(roster.is_bot(PlayerId::new(1)));
        assert_eq!(roster.bot_ids().count(), 3);
    }

    #[test]
    fn test_all_bot_roster() {
        let roster = Roster::bots(["a", "b"]);
        assert!(roster.seats().iter().all(|s| s.kind == PlayerKind::Bot));
    }
}
