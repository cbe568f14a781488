//! A match: `round_count` rounds at the same table.
//!
//! The match owns the cumulative scores between rounds. Each round gets its
//! own forked RNG and its own `Table`; the first seat rotates every round.

use tracing::info;

use super::driver::Table;
use crate::bot::BotTiming;
use crate::core::config::GameRuleConfig;
use crate::core::error::EngineError;
use crate::core::player::{PlayerId, PlayerMap, Roster};
use crate::core::rng::GameRng;
use crate::round::{Round, RoundObserver};
use crate::scoring::{standings, ScoreResult};

#[derive(Clone, Debug)]
pub struct Match {
    config: GameRuleConfig,
    roster: Roster,
    timing: BotTiming,
    rng: GameRng,
    scores: PlayerMap<i64>,
    standings: PlayerMap<u8>,
    results: Vec<ScoreResult>,
}

impl Match {
    pub fn new(config: GameRuleConfig, roster: Roster, seed: u64) -> Result<Self, EngineError> {
        let seats = roster.len();
        config.validate(seats)?;
        Ok(Self {
            config,
            roster,
            timing: BotTiming::default(),
            rng: GameRng::new(seed),
            scores: PlayerMap::with_value(seats, 0),
            standings: PlayerMap::with_value(seats, 1),
            results: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_timing(mut self, timing: BotTiming) -> Self {
        self.timing = timing;
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameRuleConfig {
        &self.config
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn scores(&self) -> &PlayerMap<i64> {
        &self.scores
    }

    /// 1 = highest score; ties share a rank.
    #[must_use]
    pub fn standings(&self) -> &PlayerMap<u8> {
        &self.standings
    }

    #[must_use]
    pub fn results(&self) -> &[ScoreResult] {
        &self.results
    }

    #[must_use]
    pub fn rounds_played(&self) -> u32 {
        self.results.len() as u32
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.rounds_played() >= self.config.round_count
    }

    /// Seat that opens the next round.
    #[must_use]
    pub fn next_first_player(&self) -> PlayerId {
        let seats = self.roster.len() as u32;
        PlayerId::new((self.rounds_played() % seats) as u8)
    }

    /// Deal the next round and hand back its table.
    pub fn begin_round<O: RoundObserver>(&mut self, observer: O) -> Result<Table<O>, EngineError> {
        if self.is_over() {
            return Err(EngineError::InvalidConfig(format!(
                "all {} rounds already played",
                self.config.round_count
            )));
        }
        let round_rng = self.rng.fork();
        let first = self.next_first_player();
        let round = Round::new(self.config.clone(), &self.scores, first, &round_rng)?;
        let mut table = Table::new(round, self.roster.clone(), self.timing.clone(), &round_rng, observer)?;
        table.start()?;
        info!(round = self.rounds_played() + 1, first = %first, "round started");
        Ok(table)
    }

    /// Fold a settled round into the cumulative scores.
    pub fn conclude_round(&mut self, result: &ScoreResult) {
        result.apply(&mut self.scores);
        self.standings = standings(&self.scores);
        self.results.push(result.clone());
        info!(
            round = self.rounds_played(),
            winners = result.winners.len(),
            transfer = result.transfer,
            "round concluded"
        );
    }

    /// Play every remaining round with bots only.
    ///
    /// Fails if a round stalls, which happens when a human seat has to act.
    pub fn simulate(&mut self, max_fires_per_round: usize) -> Result<&[ScoreResult], EngineError> {
        while !self.is_over() {
            let mut table = self.begin_round(())?;
            table.run_until_settled(max_fires_per_round)?;
            let result = table
                .round()
                .snapshot()
                .result
                .clone()
                .ok_or_else(|| {
                    EngineError::InvariantViolation(format!(
                        "round {} did not settle within {} decisions",
                        self.rounds_played() + 1,
                        max_fires_per_round
                    ))
                })?;
            self.conclude_round(&result);
        }
        Ok(&self.results)
    }
}
