//! Virtual-clock scheduler for delayed decisions.
//!
//! Bot reactions are scheduled work, not threads: each job is stamped with a
//! due time on a virtual clock and a cancellation token. The owner moves the
//! clock forward and pops due jobs one at a time, earliest first, ties in
//! scheduling order. Nothing blocks; waiting is just a later due time.
//!
//! ## Cancellation
//!
//! `cancel_all` bumps the generation instead of dropping jobs. A cancelled
//! job still pops at its due time carrying a stale token, so the owner can
//! report it rather than lose it silently.
//!
//! ```
//! use std::time::Duration;
//! use dotenko::schedule::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.schedule(Duration::from_millis(300), "late");
//! scheduler.schedule(Duration::from_millis(100), "early");
//!
//! let first = scheduler.pop_due(Duration::from_secs(1)).unwrap();
//! assert_eq!(first.job, "early");
//! assert!(scheduler.is_current(first.token));
//!
//! scheduler.cancel_all();
//! let second = scheduler.pop_due(Duration::from_secs(1)).unwrap();
//! assert!(!scheduler.is_current(second.token));
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique identifier for a scheduled job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TaskId(pub u32);

impl TaskId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// Generation a job was scheduled in. Outdated once `cancel_all` runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancelToken {
    generation: u32,
}

/// A job with its due time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Scheduled<T> {
    pub id: TaskId,
    pub due: Duration,
    pub token: CancelToken,
    pub job: T,
}

#[derive(Clone, Debug)]
pub struct Scheduler<T> {
    /// Unordered; pops search for the earliest.
    entries: Vec<Scheduled<T>>,
    now: Duration,
    generation: u32,
    next_id: u32,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            now: Duration::ZERO,
            generation: 0,
            next_id: 0,
        }
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run `job` after `delay` from now.
    pub fn schedule(&mut self, delay: Duration, job: T) -> TaskId {
        let id = TaskId::new(self.next_id);
        self.next_id += 1;
        self.entries.push(Scheduled {
            id,
            due: self.now + delay,
            token: CancelToken {
                generation: self.generation,
            },
            job,
        });
        id
    }

    /// Drop one job. Returns it if it was still queued.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.swap_remove(pos).job)
    }

    /// Outdate every queued job. Returns how many were live.
    pub fn cancel_all(&mut self) -> usize {
        let live = self.pending_count();
        self.generation = self.generation.wrapping_add(1);
        live
    }

    /// Whether a popped job's token survived every `cancel_all`.
    #[must_use]
    pub fn is_current(&self, token: CancelToken) -> bool {
        token.generation == self.generation
    }

    /// Remove and return the earliest job due at or before `until`, moving
    /// the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<Scheduled<T>> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i)?;
        let entry = self.entries.swap_remove(pos);
        self.now = self.now.max(entry.due);
        Some(entry)
    }

    /// Move the clock forward. Never moves it back.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    /// Due time of the earliest queued job, live or cancelled.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Jobs that will fire with a current token.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|e| self.is_current(e.token)).count()
    }

    /// Jobs still queued, cancelled or not.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queued jobs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Scheduled<T>> {
        self.entries.iter()
    }
}
