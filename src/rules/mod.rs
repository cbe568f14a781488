//! Legality engine.
//!
//! `legality` holds the pure rule functions. `Referee` binds them to a
//! configured ruleset behind the `RuleOracle` trait, which is what the round
//! machine and the bots call.

pub mod legality;
pub mod referee;

pub use legality::{
    can_declare_dotenko, can_play, card_matches, check_declaration, hand_totals,
    satisfies_win_condition, DeclareContext,
};
pub use referee::{Referee, RuleOracle};
