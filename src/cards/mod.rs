//! Card and deck model.
//!
//! ## Key Types
//!
//! - `Card`: immutable suit/rank value, jokers have no rank
//! - `ValueTable`: the integers each card may count as in a hand total
//! - `Hand`: one player's cards
//! - `Deck`: the draw pile with its reshuffle counter
//! - `FieldStack`: the discard pile, top card last

pub mod card;
pub mod deck;
pub mod field;
pub mod hand;
pub mod values;

pub use card::{Card, JokerColor, Rank, Suit};
pub use deck::Deck;
pub use field::FieldStack;
pub use hand::{CardSet, Hand};
pub use values::{ValueTable, Values};
