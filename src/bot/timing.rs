//! Reaction delays for scheduled bot decisions.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::time::Duration;

use crate::core::rng::GameRng;

/// Which kind of decision a delay is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    /// The bot's ordinary turn.
    Turn,
    /// Racing to declare after the field changed.
    Realtime,
    /// Contest draw or decline in a shotenko challenge.
    Challenge,
}

/// Uniform delay ranges, one per decision kind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotTiming {
    pub turn: Range<Duration>,
    pub realtime: Range<Duration>,
    pub challenge: Range<Duration>,
}

impl Default for BotTiming {
    fn default() -> Self {
        Self {
            turn: Duration::from_millis(500)..Duration::from_millis(3000),
            realtime: Duration::from_millis(100)..Duration::from_millis(2000),
            challenge: Duration::from_millis(500)..Duration::from_millis(2000),
        }
    }
}

impl BotTiming {
    /// Every delay zero. Decisions fire in scheduling order.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            turn: Duration::ZERO..Duration::ZERO,
            realtime: Duration::ZERO..Duration::ZERO,
            challenge: Duration::ZERO..Duration::ZERO,
        }
    }

    #[must_use]
    pub fn range(&self, kind: DecisionKind) -> Range<Duration> {
        match kind {
            DecisionKind::Turn => self.turn.clone(),
            DecisionKind::Realtime => self.realtime.clone(),
            DecisionKind::Challenge => self.challenge.clone(),
        }
    }

    /// Draw a delay for `kind`.
    pub fn delay(&self, kind: DecisionKind, rng: &mut GameRng) -> Duration {
        rng.gen_duration(self.range(kind))
    }
}
