//! Recombining trinomial tree with equal branch probabilities.
//!
//! Each node branches to `S·u`, `S·m` and `S·d` with probability `1/3`,
//! where
//!
//! * `M = e^{(rd − rf)dt}`, `V = e^{σ²dt}`
//! * `K = M(V + 3)/4`, `m = M(3 − V)/2`
//! * `u, d = K ± √(K² − m²)`
//!
//! This matches the first two moments of the log-normal step, and `u·d = m²`
//! makes the lattice recombine: step `i` has `2i + 1` nodes, ordered from
//! the highest to the lowest price.

use super::{StrikeCursor, TimeGrid, TreeSteps};
use amopt_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Rate, Real, Size, Time, Volatility,
};
use amopt_instruments::{OptionType, PlainVanillaPayoff, StrikeSchedule};

/// A recombining trinomial tree for a GBM underlying.
#[derive(Debug, Clone)]
pub struct TrinomialTree {
    grid: TimeGrid,
    up: Real,
    mid: Real,
    down: Real,
    discount: DiscountFactor,
    levels: Vec<Vec<Real>>,
}

impl TrinomialTree {
    /// Build the full lattice for expiry `texp`.
    ///
    /// Requires `vol > 0` and `texp > 0`. Fails with
    /// [`Error::NumericInstability`] when `σ²dt ≥ ln 3`, which makes the
    /// middle factor non-positive.
    pub fn new(
        spot: Real,
        texp: Time,
        vol: Volatility,
        rd: Rate,
        rf: Rate,
        steps: &TreeSteps,
    ) -> Result<Self> {
        ensure!(
            vol > 0.0 && texp > 0.0,
            "trinomial tree needs positive volatility and expiry, got vol = {vol}, texp = {texp}"
        );
        let n = steps.steps_for(texp, vol)?;
        let grid = TimeGrid::uniform(texp, n)?;
        let dt = grid.dt();

        let growth = ((rd - rf) * dt).exp();
        let v = (vol * vol * dt).exp();
        let k = growth * (v + 3.0) / 4.0;
        let mid = growth * (3.0 - v) / 2.0;
        if !(mid > 0.0) {
            return Err(Error::NumericInstability(format!(
                "trinomial tree: middle factor {mid} (σ²dt = {})",
                vol * vol * dt
            )));
        }
        let spread = (k * k - mid * mid).sqrt();
        let (up, down) = (k + spread, k - spread);
        if !(down > 0.0 && up.is_finite()) {
            return Err(Error::NumericInstability(format!(
                "trinomial tree: down factor {down} with up factor {up}"
            )));
        }

        let mut levels: Vec<Vec<Real>> = Vec::with_capacity(n + 1);
        levels.push(vec![spot]);
        for i in 0..n {
            let prev = &levels[i];
            let last = prev[prev.len() - 1];
            let mut next = Vec::with_capacity(prev.len() + 2);
            next.extend(prev.iter().map(|s| s * up));
            next.push(last * mid);
            next.push(last * down);
            levels.push(next);
        }

        Ok(Self {
            grid,
            up,
            mid,
            down,
            discount: (-rd * dt).exp(),
            levels,
        })
    }

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.grid.steps()
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.grid.dt()
    }

    /// `(u, m, d)` factors.
    pub fn factors(&self) -> (Real, Real, Real) {
        (self.up, self.mid, self.down)
    }

    /// Per-step discount factor.
    pub fn discount(&self) -> DiscountFactor {
        self.discount
    }

    /// Number of nodes at time step `i`.
    pub fn size(&self, i: Size) -> Size {
        2 * i + 1
    }

    /// Underlying value at node `(i, j)`, `j = 0` being the highest.
    pub fn underlying(&self, i: Size, j: Size) -> Real {
        self.levels[i][j]
    }

    /// Value an American option whose strike follows `schedule`.
    pub fn rollback_american(&self, option_type: OptionType, schedule: &StrikeSchedule) -> Real {
        let mut cursor = StrikeCursor::at_expiry(schedule, self.grid.end());
        self.rollback(option_type, |t| cursor.strike_at(t), true)
    }

    /// Value a European option with a fixed strike.
    pub fn rollback_european(&self, option_type: OptionType, strike: Real) -> Real {
        self.rollback(option_type, |_| strike, false)
    }

    fn rollback<F>(&self, option_type: OptionType, mut strike_at: F, american: bool) -> Real
    where
        F: FnMut(Time) -> Real,
    {
        let n = self.steps();
        let payoff = PlainVanillaPayoff::new(option_type, strike_at(self.grid.end()));
        let mut values: Vec<Real> = self.levels[n].iter().map(|&s| payoff.value(s)).collect();

        let weight = self.discount / 3.0;
        for i in (0..n).rev() {
            let payoff = PlainVanillaPayoff::new(option_type, strike_at(self.grid.time(i)));
            for j in 0..self.size(i) {
                let hold = weight * (values[j] + values[j + 1] + values[j + 2]);
                values[j] = if american {
                    hold.max(payoff.value(self.levels[i][j]))
                } else {
                    hold
                };
            }
            values.truncate(self.size(i));
        }

        values[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amopt_math::normal_cdf;
    use approx::assert_abs_diff_eq;

    fn bs_put_reference() -> Real {
        let (s, k, r, sigma, t): (Real, Real, Real, Real, Real) = (100.0, 100.0, 0.05, 0.2, 1.0);
        let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt());
        let d2 = d1 - sigma * t.sqrt();
        k * (-r * t).exp() * normal_cdf(-d2) - s * normal_cdf(-d1)
    }

    fn tree() -> TrinomialTree {
        TrinomialTree::new(100.0, 1.0, 0.2, 0.05, 0.0, &TreeSteps::default().with_max(400)).unwrap()
    }

    #[test]
    fn lattice_recombines() {
        let t = tree();
        let (u, m, d) = t.factors();
        assert_abs_diff_eq!(u * d, m * m, epsilon = 1e-14);
        for i in [0, 1, 10, t.steps()] {
            assert_eq!(t.levels[i].len(), t.size(i));
        }
        // Middle node of level 2 is reached by u·d and by m·m.
        assert_abs_diff_eq!(t.underlying(2, 2), 100.0 * m * m, epsilon = 1e-10);
        assert!(t.underlying(3, 0) > t.underlying(3, 1));
    }

    #[test]
    fn one_step_matches_forward() {
        let t = tree();
        let (u, m, d) = t.factors();
        let mean = (u + m + d) / 3.0;
        assert_abs_diff_eq!(mean, (0.05 * t.dt()).exp(), epsilon = 1e-14);
    }

    #[test]
    fn european_put_converges_to_bs() {
        let bs = bs_put_reference();
        let price = tree().rollback_european(OptionType::Put, 100.0);
        assert!((price - bs).abs() < 0.02, "trinomial {price:.4} vs BS {bs:.4}");
    }

    #[test]
    fn american_put_carries_premium() {
        let t = tree();
        let eu = t.rollback_european(OptionType::Put, 100.0);
        let am = t.rollback_american(OptionType::Put, &StrikeSchedule::constant(100.0));
        assert!(am > eu + 0.1, "American {am:.4} vs European {eu:.4}");
    }

    #[test]
    fn excessive_step_variance_is_unstable() {
        // σ²dt = 1.21 > ln 3
        let steps = TreeSteps::new(1, 1).unwrap();
        let err = TrinomialTree::new(100.0, 1.0, 1.1, 0.05, 0.0, &steps).unwrap_err();
        assert!(matches!(err, Error::NumericInstability(_)), "{err}");
    }
}
