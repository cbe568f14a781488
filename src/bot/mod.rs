//! Bot decision engine.
//!
//! - `decision`: the per-decision policy over a `BotView`
//! - `realtime`: which bots race to declare after a field change
//! - `timing`: human-like reaction delays

pub mod decision;
pub mod realtime;
pub mod timing;

pub use decision::{best_play, decide, score_play, BotAction, BotView};
pub use realtime::scan_declarations;
pub use timing::{BotTiming, DecisionKind};
