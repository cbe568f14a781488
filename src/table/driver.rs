//! Table driver: one round, its bots and their scheduled decisions.
//!
//! Human intents arrive through [`Table::submit_intent`]. Bot decisions are
//! jobs on a virtual-clock [`Scheduler`]; [`Table::advance`] moves the clock
//! and fires whatever came due. Every fired job re-checks that the situation
//! it was scheduled for still holds, and entering `DotenkoProcessing` or
//! `Finished` cancels everything still queued.

use rustc_hash::{FxHashMap, FxHashSet};
use std::time::Duration;
use tracing::debug;

use crate::bot::{decide, scan_declarations, BotTiming, DecisionKind};
use crate::core::action::Intent;
use crate::core::error::{EngineError, IllegalReason, StaleReason};
use crate::core::player::{PlayerId, Roster};
use crate::core::rng::GameRng;
use crate::core::state::{Phase, RoundState};
use crate::round::{dispatch, Applied, Round, RoundEvent, RoundObserver};
use crate::schedule::{Scheduled, Scheduler, TaskId};

/// A pending bot decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BotTask {
    pub player: PlayerId,
    pub kind: DecisionKind,
    /// Round version when scheduled.
    pub epoch: u64,
}

/// What happened when a scheduled decision came due.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FireReport {
    pub task: TaskId,
    pub player: PlayerId,
    pub kind: DecisionKind,
    /// Virtual time it fired at.
    pub at: Duration,
    /// The intent the round accepted, or why nothing was applied.
    pub outcome: Result<Intent, EngineError>,
}

impl FireReport {
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.outcome.as_ref().is_err_and(EngineError::is_stale)
    }

    #[must_use]
    pub fn applied(&self) -> Option<&Intent> {
        self.outcome.as_ref().ok()
    }
}

pub struct Table<O: RoundObserver = ()> {
    round: Round,
    roster: Roster,
    scheduler: Scheduler<BotTask>,
    timing: BotTiming,
    /// Bot delay stream, separate from the deck.
    rng: GameRng,
    observer: O,
    turn_task: Option<TaskId>,
    realtime_tasks: FxHashMap<PlayerId, TaskId>,
    challenge_tasks: FxHashSet<PlayerId>,
}

impl<O: RoundObserver> Table<O> {
    pub fn new(round: Round, roster: Roster, timing: BotTiming, rng: &GameRng, observer: O) -> Result<Self, EngineError> {
        if roster.len() != round.player_count() {
            return Err(EngineError::InvalidConfig(format!(
                "roster has {} seats, round has {}",
                roster.len(),
                round.player_count()
            )));
        }
        Ok(Self {
            round,
            roster,
            scheduler: Scheduler::new(),
            timing,
            rng: rng.for_context("bots"),
            observer,
            turn_task: None,
            realtime_tasks: FxHashMap::default(),
            challenge_tasks: FxHashSet::default(),
        })
    }

    /// Deal if the round is waiting, then schedule the first decisions.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.round.phase() == Phase::Waiting {
            let applied = self.round.deal()?;
            self.after_transition(&applied);
        } else {
            self.plan(true);
        }
        Ok(())
    }

    #[must_use]
    pub fn round(&self) -> &Round {
        &self.round
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler<BotTask> {
        &self.scheduler
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    #[must_use]
    pub fn current_snapshot(&self) -> RoundState {
        self.round.current_snapshot()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.round.is_finished()
    }

    /// Hand back the round and the observer.
    pub fn finish(self) -> (Round, O) {
        (self.round, self.observer)
    }

    /// Apply an intent from the outer layer, typically the human seat.
    pub fn submit_intent(&mut self, player: PlayerId, intent: Intent) -> Result<Applied, EngineError> {
        let applied = self.round.submit_intent(player, intent)?;
        self.after_transition(&applied);
        Ok(applied)
    }

    /// Move the clock forward by `dt`, firing every decision that comes due.
    pub fn advance(&mut self, dt: Duration) -> Vec<FireReport> {
        let until = self.scheduler.now() + dt;
        let mut reports = Vec::new();
        while let Some(task) = self.scheduler.pop_due(until) {
            reports.push(self.fire(task));
        }
        self.scheduler.advance_to(until);
        reports
    }

    /// Fire decisions in due order until the round finishes, nothing is
    /// queued (a human has to act), or `max_fires` decisions have fired.
    pub fn run_until_settled(&mut self, max_fires: usize) -> Result<Vec<FireReport>, EngineError> {
        let mut reports = Vec::new();
        while !self.round.is_finished() && reports.len() < max_fires {
            if let Some(err) = self.round.halted() {
                return Err(err.clone());
            }
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            match self.scheduler.pop_due(due) {
                Some(task) => reports.push(self.fire(task)),
                None => break,
            }
        }
        match self.round.halted() {
            Some(err) => Err(err.clone()),
            None => Ok(reports),
        }
    }

    fn fire(&mut self, task: Scheduled<BotTask>) -> FireReport {
        let BotTask { player, kind, epoch } = task.job;
        match kind {
            DecisionKind::Turn if self.turn_task == Some(task.id) => self.turn_task = None,
            DecisionKind::Realtime if self.realtime_tasks.get(&player) == Some(&task.id) => {
                self.realtime_tasks.remove(&player);
            }
            DecisionKind::Challenge => {
                self.challenge_tasks.remove(&player);
            }
            _ => {}
        }

        let outcome = if self.scheduler.is_current(task.token) {
            self.decide_and_submit(player, kind, epoch)
        } else {
            Err(EngineError::stale(player, StaleReason::Cancelled))
        };
        match &outcome {
            Ok(intent) => debug!(player = %player, kind = ?kind, intent = intent.kind(), "bot decision applied"),
            Err(err) => debug!(player = %player, kind = ?kind, error = %err, "bot decision dropped"),
        }
        FireReport {
            task: task.id,
            player,
            kind,
            at: task.due,
            outcome,
        }
    }

    fn decide_and_submit(&mut self, player: PlayerId, kind: DecisionKind, epoch: u64) -> Result<Intent, EngineError> {
        let phase = self.round.phase();
        let intent = match kind {
            DecisionKind::Turn => {
                let state = self.round.snapshot();
                if phase != Phase::Playing {
                    return Err(EngineError::stale(player, StaleReason::Phase(phase)));
                }
                if state.version != epoch || !state.is_current(player) {
                    return Err(EngineError::stale(player, StaleReason::Outdated));
                }
                self.bot_intent(player)?
            }
            DecisionKind::Realtime => {
                if phase != Phase::Playing {
                    return Err(EngineError::stale(player, StaleReason::Phase(phase)));
                }
                if !self.round.is_dotenko_eligible(player) {
                    return Err(EngineError::stale(player, StaleReason::Outdated));
                }
                Intent::Declare
            }
            DecisionKind::Challenge => {
                if phase != Phase::Challenge {
                    return Err(EngineError::stale(player, StaleReason::Phase(phase)));
                }
                self.bot_intent(player)?
            }
        };

        let applied = self.round.submit_intent(player, intent.clone())?;
        self.after_transition(&applied);
        Ok(intent)
    }

    fn bot_intent(&self, player: PlayerId) -> Result<Intent, EngineError> {
        let view = self
            .round
            .bot_view(player)
            .ok_or_else(|| EngineError::from(IllegalReason::UnknownPlayer(player)))?;
        decide(&view, self.round.referee())
            .map(Intent::from)
            .ok_or_else(|| EngineError::stale(player, StaleReason::Outdated))
    }

    fn after_transition(&mut self, applied: &Applied) {
        dispatch(&mut self.observer, &applied.events);

        let freezes = applied.events.iter().any(|e| {
            matches!(
                e,
                RoundEvent::PhaseChanged {
                    to: Phase::DotenkoProcessing | Phase::Finished,
                    ..
                }
            )
        });
        if freezes {
            let cancelled = self.scheduler.cancel_all();
            self.turn_task = None;
            self.realtime_tasks.clear();
            self.challenge_tasks.clear();
            debug!(cancelled, "pending decisions cancelled");
        }
        self.plan(applied.changes_field());
    }

    fn plan(&mut self, field_changed: bool) {
        match self.round.phase() {
            Phase::Playing => {
                self.plan_turn();
                if field_changed {
                    self.plan_realtime();
                }
            }
            Phase::Challenge => self.plan_challenge(),
            _ => {}
        }
    }

    /// Replace the turn decision with one for the current state.
    fn plan_turn(&mut self) {
        if let Some(id) = self.turn_task.take() {
            self.scheduler.cancel(id);
        }
        let state = self.round.snapshot();
        let player = state.current_turn;
        if !self.roster.is_bot(player) {
            return;
        }
        let epoch = state.version;
        let delay = self.timing.delay(DecisionKind::Turn, &mut self.rng);
        let id = self.scheduler.schedule(
            delay,
            BotTask {
                player,
                kind: DecisionKind::Turn,
                epoch,
            },
        );
        self.turn_task = Some(id);
    }

    /// Schedule a declaration for every bot that newly qualifies.
    fn plan_realtime(&mut self) {
        let bots: Vec<PlayerId> = self.roster.bot_ids().collect();
        let eligible = scan_declarations(self.round.snapshot(), self.round.referee(), &bots);
        let epoch = self.round.snapshot().version;
        for player in eligible {
            if self.realtime_tasks.contains_key(&player) {
                continue;
            }
            let delay = self.timing.delay(DecisionKind::Realtime, &mut self.rng);
            debug!(player = %player, delay_ms = delay.as_millis() as u64, "declaration race entry");
            let id = self.scheduler.schedule(
                delay,
                BotTask {
                    player,
                    kind: DecisionKind::Realtime,
                    epoch,
                },
            );
            self.realtime_tasks.insert(player, id);
        }
    }

    fn plan_challenge(&mut self) {
        let state = self.round.snapshot();
        let epoch = state.version;
        let pending: Vec<PlayerId> = state
            .challenge_pending()
            .filter(|p| self.roster.is_bot(*p) && !self.challenge_tasks.contains(p))
            .collect();
        for player in pending {
            let delay = self.timing.delay(DecisionKind::Challenge, &mut self.rng);
            self.scheduler.schedule(
                delay,
                BotTask {
                    player,
                    kind: DecisionKind::Challenge,
                    epoch,
                },
            );
            self.challenge_tasks.insert(player);
        }
    }
}
