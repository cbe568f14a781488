//! Realtime declaration scan.
//!
//! Run whenever the field top changes: every listed bot whose hand now
//! qualifies gets a declaration scheduled. The player who played the top card
//! is never listed since a declaration on one's own card is illegal.

use crate::core::player::PlayerId;
use crate::core::state::{Phase, RoundState};
use crate::rules::{DeclareContext, RuleOracle};

/// Bots in `candidates` that may declare right now, in the given order.
#[must_use]
pub fn scan_declarations(state: &RoundState, oracle: &dyn RuleOracle, candidates: &[PlayerId]) -> Vec<PlayerId> {
    if state.phase != Phase::Playing {
        return Vec::new();
    }
    let Some(field_top) = state.field_top() else {
        return Vec::new();
    };

    candidates
        .iter()
        .copied()
        .filter(|&bot| {
            let ctx = DeclareContext {
                field_top,
                top_owner: state.field.top_owner(),
                declarant: bot,
                window_open: true,
            };
            oracle.can_declare_dotenko(state.hand(bot).cards(), &ctx)
        })
        .collect()
}
