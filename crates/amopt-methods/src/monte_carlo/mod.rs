//! Monte Carlo simulation for early-exercise pricing.
//!
//! # Overview
//!
//! * [`SimulationPathSet`]: a block of GBM paths on a uniform grid,
//!   optionally antithetic
//! * [`longstaff_schwartz()`]: least-squares Monte Carlo for American payoffs

pub mod longstaff_schwartz;

pub use longstaff_schwartz::{longstaff_schwartz, ExerciseIndicator, LsmcConfig, LsmcResult};

use amopt_core::{
    ensure,
    errors::Result,
    Real, Size, Time, Volatility,
};
use amopt_math::GaussianRng;

// ─── SimulationPathSet ────────────────────────────────────────────────────────

/// `n_paths × (n_steps + 1)` simulated prices, stored row-major.
///
/// In antithetic mode paths `i` and `i + n_paths/2` are driven by opposite
/// normal draws.
#[derive(Debug, Clone)]
pub struct SimulationPathSet {
    n_paths: Size,
    n_steps: Size,
    dt: Time,
    antithetic: bool,
    values: Vec<Real>,
}

impl SimulationPathSet {
    /// Simulate geometric Brownian motion
    /// `S_{t+dt} = S_t · exp((μ − ½σ²)dt + σ√dt·Z)`.
    ///
    /// Fails with [`amopt_core::Error::InvalidArgument`] for zero paths or steps, or an
    /// odd path count in antithetic mode.
    #[allow(clippy::too_many_arguments)]
    pub fn simulate_gbm(
        spot: Real,
        drift: Real,
        sigma: Volatility,
        texp: Time,
        n_paths: Size,
        n_steps: Size,
        antithetic: bool,
        rng: &mut GaussianRng,
    ) -> Result<Self> {
        ensure!(
            n_paths > 0 && n_steps > 0,
            "need at least one path and one step, got {n_paths} paths and {n_steps} steps"
        );
        ensure!(
            !antithetic || n_paths % 2 == 0,
            "antithetic sampling needs an even number of paths, got {n_paths}"
        );

        let dt = texp / n_steps as Real;
        let mu_dt = (drift - 0.5 * sigma * sigma) * dt;
        let sig_sqrt_dt = sigma * dt.sqrt();
        let width = n_steps + 1;
        let mut values = vec![0.0; n_paths * width];
        for p in 0..n_paths {
            values[p * width] = spot;
        }

        let draws = if antithetic { n_paths / 2 } else { n_paths };
        let mut z = vec![0.0; draws];
        for j in 1..=n_steps {
            rng.fill(&mut z);
            for p in 0..n_paths {
                let zp = if p < draws { z[p] } else { -z[p - draws] };
                let prev = values[p * width + j - 1];
                values[p * width + j] = prev * (mu_dt + sig_sqrt_dt * zp).exp();
            }
        }

        Ok(Self {
            n_paths,
            n_steps,
            dt,
            antithetic,
            values,
        })
    }

    /// Number of paths.
    pub fn n_paths(&self) -> Size {
        self.n_paths
    }

    /// Number of time steps per path.
    pub fn n_steps(&self) -> Size {
        self.n_steps
    }

    /// Step length.
    pub fn dt(&self) -> Time {
        self.dt
    }

    /// Whether the second half of the paths mirrors the first.
    pub fn is_antithetic(&self) -> bool {
        self.antithetic
    }

    /// Price on path `path` at step `step`.
    #[inline]
    pub fn price(&self, path: Size, step: Size) -> Real {
        self.values[path * (self.n_steps + 1) + step]
    }

    /// Full price history of one path.
    pub fn path(&self, path: Size) -> &[Real] {
        let width = self.n_steps + 1;
        &self.values[path * width..(path + 1) * width]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amopt_math::Statistics;

    #[test]
    fn antithetic_pairs_mirror_each_other() {
        let mut rng = GaussianRng::new(3);
        let (s0, mu, sigma) = (100.0, 0.03, 0.25);
        let set = SimulationPathSet::simulate_gbm(s0, mu, sigma, 1.0, 8, 4, true, &mut rng).unwrap();
        let dt: Real = 0.25;
        let mu_dt = (mu - 0.5 * sigma * sigma) * dt;
        for i in 0..4 {
            for j in 0..=4 {
                // log S_a + log S_b = 2 log S_0 + 2 j μdt
                let lhs = (set.price(i, j) / s0).ln() + (set.price(i + 4, j) / s0).ln();
                assert!((lhs - 2.0 * j as Real * mu_dt).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn terminal_mean_is_forward() {
        let mut rng = GaussianRng::new(11);
        let set =
            SimulationPathSet::simulate_gbm(100.0, 0.05, 0.2, 1.0, 50_000, 1, true, &mut rng).unwrap();
        let s: Statistics = (0..set.n_paths()).map(|p| set.price(p, 1)).collect();
        let forward = 100.0 * 0.05_f64.exp();
        assert!((s.mean().unwrap() - forward).abs() < 0.3);
    }

    #[test]
    fn path_layout() {
        let mut rng = GaussianRng::new(1);
        let set = SimulationPathSet::simulate_gbm(50.0, 0.0, 0.1, 2.0, 3, 5, false, &mut rng).unwrap();
        assert_eq!(set.path(2).len(), 6);
        assert_eq!(set.path(2)[0], 50.0);
        assert_eq!(set.path(1)[3], set.price(1, 3));
        assert!((set.dt() - 0.4).abs() < 1e-15);
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut rng = GaussianRng::new(1);
        assert!(SimulationPathSet::simulate_gbm(1.0, 0.0, 0.1, 1.0, 3, 5, true, &mut rng).is_err());
        assert!(SimulationPathSet::simulate_gbm(1.0, 0.0, 0.1, 1.0, 0, 5, false, &mut rng).is_err());
        assert!(SimulationPathSet::simulate_gbm(1.0, 0.0, 0.1, 1.0, 4, 0, false, &mut rng).is_err());
    }
}
