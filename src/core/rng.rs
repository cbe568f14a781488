//! Deterministic random number generation for deals and bot timing.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces the same deal, reshuffles and delays
//! - **Forkable**: Each round gets its own branch of the match seed
//! - **Context streams**: Deck shuffling and bot timing never share a stream,
//!   so adding a bot does not change the cards that get dealt
//!
//! ```
//! use dotenko::core::GameRng;
//!
//! let mut match_rng = GameRng::new(7);
//! let round = match_rng.fork();
//!
//! let mut deck_a = round.for_context("deck");
//! let mut deck_b = GameRng::new(7).fork().for_context("deck");
//! assert_eq!(deck_a.gen_range(0..52), deck_b.gen_range(0..52));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};
use std::ops::Range;
use std::time::Duration;

/// Seeded ChaCha8 generator with fork and context streams.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork a new independent branch, one per round.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    /// Derive an independent stream for a named purpose.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn gen_range(&mut self, range: Range<i32>) -> i32 {
        self.inner.gen_range(range)
    }

    /// Uniform duration within `[range.start, range.end)`.
    ///
    /// A degenerate range yields its start.
    pub fn gen_duration(&mut self, range: Range<Duration>) -> Duration {
        if range.end <= range.start {
            return range.start;
        }
        let secs = self
            .inner
            .gen_range(range.start.as_secs_f64()..range.end.as_secs_f64());
        Duration::from_secs_f64(secs)
    }

    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.inner);
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
