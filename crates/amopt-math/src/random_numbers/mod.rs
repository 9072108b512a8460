//! Seeded random number generation.
//!
//! Thin wrappers over `rand`'s `StdRng`, so that a seed fully determines a
//! simulation run.

use amopt_core::Real;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Standard-normal deviate generator.
#[derive(Debug, Clone)]
pub struct GaussianRng {
    rng: StdRng,
}

impl GaussianRng {
    /// Generator seeded deterministically from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Next N(0, 1) deviate.
    pub fn next_real(&mut self) -> Real {
        self.rng.sample(StandardNormal)
    }

    /// Fill `out` with N(0, 1) deviates.
    pub fn fill(&mut self, out: &mut [Real]) {
        for z in out.iter_mut() {
            *z = self.rng.sample(StandardNormal);
        }
    }
}
