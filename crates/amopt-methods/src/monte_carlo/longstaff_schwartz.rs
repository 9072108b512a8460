//! Least-squares Monte Carlo (Longstaff-Schwartz) for American payoffs.
//!
//! Working backwards from expiry, the continuation value of every
//! in-the-money path is estimated by regressing its realised discounted cash
//! flow on a polynomial in the current (strike-scaled) price. A path is
//! exercised where the immediate payoff beats that estimate; each path keeps
//! only its earliest exercise step.

use super::SimulationPathSet;
use amopt_core::{
    ensure,
    errors::Result,
    Rate, Real, Size, Time, Volatility,
};
use amopt_instruments::PlainVanillaPayoff;
use amopt_math::{GaussianRng, LinearLeastSquaresRegression, PolynomialBasis, Statistics};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Simulation and regression settings.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsmcConfig {
    /// Number of simulated paths.
    pub n_paths: Size,
    /// Number of exercise dates (time steps).
    pub n_steps: Size,
    /// Degree of the regression polynomial (`degree + 1` basis functions).
    pub poly_degree: Size,
    /// Polynomial family.
    pub basis: PolynomialBasis,
    /// RNG seed.
    pub seed: u64,
    /// Pair each path with its mirror image.
    pub antithetic: bool,
    /// Relative singular-value cutoff of the regression. `None` uses the
    /// machine-precision default.
    pub regression_rcond: Option<Real>,
}

impl Default for LsmcConfig {
    fn default() -> Self {
        Self {
            n_paths: 10_000,
            n_steps: 50,
            poly_degree: 3,
            basis: PolynomialBasis::Laguerre,
            seed: 42,
            antithetic: true,
            regression_rcond: None,
        }
    }
}

impl LsmcConfig {
    /// Replace the path count.
    pub fn with_paths(mut self, n_paths: Size) -> Self {
        self.n_paths = n_paths;
        self
    }

    /// Replace the step count.
    pub fn with_steps(mut self, n_steps: Size) -> Self {
        self.n_steps = n_steps;
        self
    }

    /// Replace the basis family and degree.
    pub fn with_basis(mut self, basis: PolynomialBasis, poly_degree: Size) -> Self {
        self.basis = basis;
        self.poly_degree = poly_degree;
        self
    }

    /// Replace the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable antithetic pairing.
    pub fn with_antithetic(mut self, antithetic: bool) -> Self {
        self.antithetic = antithetic;
        self
    }

    /// Set the regression singular-value cutoff.
    pub fn with_regression_rcond(mut self, rcond: Real) -> Self {
        self.regression_rcond = Some(rcond);
        self
    }
}

/// Price and standard error of a least-squares Monte Carlo run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LsmcResult {
    /// Estimated option value.
    pub price: Real,
    /// Standard error of the estimate.
    pub std_error: Real,
}

// ─── ExerciseIndicator ────────────────────────────────────────────────────────

/// The step at which each path is exercised, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseIndicator {
    steps: Vec<Option<Size>>,
}

impl ExerciseIndicator {
    /// No path exercised.
    pub fn new(n_paths: Size) -> Self {
        Self {
            steps: vec![None; n_paths],
        }
    }

    /// Exercise `path` at `step`, replacing any later exercise.
    pub fn mark(&mut self, path: Size, step: Size) {
        self.steps[path] = Some(step);
    }

    /// Exercise step of `path`.
    pub fn exercise_step(&self, path: Size) -> Option<Size> {
        self.steps[path]
    }

    /// Number of paths exercised at some step.
    pub fn exercised_count(&self) -> Size {
        self.steps.iter().filter(|s| s.is_some()).count()
    }
}

// ─── Algorithm ────────────────────────────────────────────────────────────────

/// Least-squares Monte Carlo value of an American `payoff`.
///
/// Paths follow GBM with drift `drift`; cash flows are discounted at
/// `discount_rate`.
pub fn longstaff_schwartz(
    payoff: &PlainVanillaPayoff,
    spot: Real,
    texp: Time,
    drift: Rate,
    discount_rate: Rate,
    sigma: Volatility,
    config: &LsmcConfig,
) -> Result<LsmcResult> {
    for (name, v) in [
        ("spot", spot),
        ("expiry", texp),
        ("drift", drift),
        ("discount rate", discount_rate),
        ("volatility", sigma),
    ] {
        ensure!(v.is_finite(), "{name} must be finite, got {v}");
    }
    ensure!(
        spot > 0.0 && texp >= 0.0 && sigma >= 0.0,
        "need spot > 0, expiry >= 0 and volatility >= 0, got {spot}, {texp}, {sigma}"
    );

    let mut rng = GaussianRng::new(config.seed);
    let paths = SimulationPathSet::simulate_gbm(
        spot,
        drift,
        sigma,
        texp,
        config.n_paths,
        config.n_steps,
        config.antithetic,
        &mut rng,
    )?;
    if texp == 0.0 {
        return Ok(LsmcResult {
            price: payoff.value(spot),
            std_error: 0.0,
        });
    }

    let n = paths.n_paths();
    let m = paths.n_steps();
    let step_discount = (-discount_rate * paths.dt()).exp();
    let scale = if payoff.strike > 0.0 { payoff.strike } else { spot };
    let n_basis = config.basis.size(config.poly_degree);

    let mut indicator = ExerciseIndicator::new(n);
    for p in 0..n {
        if payoff.value(paths.price(p, m)) > 0.0 {
            indicator.mark(p, m);
        }
    }

    let mut x = Vec::with_capacity(n);
    let mut y = Vec::with_capacity(n);
    let mut itm = Vec::with_capacity(n);
    for i in (1..m).rev() {
        itm.clear();
        itm.extend((0..n).filter(|&p| payoff.value(paths.price(p, i)) > 0.0));
        if itm.len() < n_basis {
            tracing::trace!(step = i, in_the_money = itm.len(), "skipping regression");
            continue;
        }

        x.clear();
        y.clear();
        for &p in &itm {
            x.push(paths.price(p, i) / scale);
            y.push(match indicator.exercise_step(p) {
                Some(e) => payoff.value(paths.price(p, e)) * step_discount.powi((e - i) as i32),
                None => 0.0,
            });
        }

        let regression = LinearLeastSquaresRegression::polynomial(
            &x,
            &y,
            config.basis,
            config.poly_degree,
            config.regression_rcond,
        )?;
        for (&p, &continuation) in itm.iter().zip(regression.fitted_values()) {
            if payoff.value(paths.price(p, i)) > continuation {
                indicator.mark(p, i);
            }
        }
    }

    let path_values: Vec<Real> = (0..n)
        .map(|p| match indicator.exercise_step(p) {
            Some(e) => payoff.value(paths.price(p, e)) * step_discount.powi(e as i32),
            None => 0.0,
        })
        .collect();

    let stats: Statistics = if paths.is_antithetic() {
        let half = n / 2;
        (0..half)
            .map(|p| 0.5 * (path_values[p] + path_values[p + half]))
            .collect()
    } else {
        path_values.iter().copied().collect()
    };

    let price = stats.mean().unwrap_or(0.0);
    let std_error = stats.error_estimate().unwrap_or(0.0);
    tracing::debug!(
        price,
        std_error,
        exercised = indicator.exercised_count(),
        n_paths = n,
        "least-squares Monte Carlo"
    );

    Ok(LsmcResult { price, std_error })
}
