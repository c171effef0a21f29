//! Deterministic simulation-level RNG.
//!
//! Only the task generator draws random numbers; the allocation strategies
//! and the route planner are fully deterministic.  One seeded `SmallRng` is
//! therefore enough, and the same seed always produces the same task stream.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Simulation-level RNG.
///
/// Owned by the task source; nothing else in the engine draws from it.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }
}
