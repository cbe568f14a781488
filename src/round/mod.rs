//! Round state machine.
//!
//! - `machine`: `Round`, the owner of the live `RoundState`
//! - `challenge`: the shotenko contest sub-round
//! - `event`: events returned by every transition, and observers
//! - `layout`: fixed deals for replays and tests

mod challenge;
pub mod event;
pub mod layout;
pub mod machine;

pub use event::{dispatch, Applied, EventLog, RoundEvent, RoundObserver};
pub use layout::RoundLayout;
pub use machine::Round;
