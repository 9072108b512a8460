//! Recombining binomial tree for American exercise.
//!
//! Two parameterisations of the up/down factors are provided:
//!
//! | Scheme | Factors | `p_up` |
//! |---|---|---|
//! | [`BinomialScheme::MomentMatching`] | `u, d = M(1 ± √(V − 1))` | `½` |
//! | [`BinomialScheme::CoxRossRubinstein`] | `d = c − √(c² − 1)`, `u = 1/d` | `(M − d)/(u − d)` |
//!
//! with `M = e^{(rd − rf)dt}`, `V = e^{σ²dt}` and
//! `c = ½(e^{−(rd − rf)dt} + e^{(rd − rf + σ²)dt})`.
//!
//! Node `(i, j)` is the state after `j` up-moves and `i − j` down-moves:
//! `S u^j d^{i−j}`.

use super::{StrikeCursor, TimeGrid, TreeSteps};
use amopt_core::{
    ensure,
    errors::{Error, Result},
    DiscountFactor, Rate, Real, Size, Time, Volatility,
};
use amopt_instruments::{OptionType, PlainVanillaPayoff, StrikeSchedule};
use std::fmt;

/// Up/down factor parameterisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinomialScheme {
    /// Match the first two moments of the log-normal step, `p = ½`.
    #[default]
    MomentMatching,
    /// Cox-Ross-Rubinstein equal-jump factors, `u·d = 1`.
    CoxRossRubinstein,
}

impl fmt::Display for BinomialScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinomialScheme::MomentMatching => write!(f, "moment matching"),
            BinomialScheme::CoxRossRubinstein => write!(f, "Cox-Ross-Rubinstein"),
        }
    }
}

/// A recombining binomial tree for a GBM underlying.
#[derive(Debug, Clone)]
pub struct BinomialTree {
    spot: Real,
    grid: TimeGrid,
    up: Real,
    down: Real,
    p_up: Real,
    discount: DiscountFactor,
    up_powers: Vec<Real>,
    down_powers: Vec<Real>,
}

impl BinomialTree {
    /// Build the tree for expiry `texp`, with the step count chosen by
    /// `steps` from `texp` and `vol`.
    ///
    /// Requires `vol > 0` and `texp > 0`; the zero-volatility and
    /// zero-expiry limits are handled by the callers. Fails with
    /// [`Error::NumericInstability`] when the factors give a non-positive
    /// down move or a probability outside `[0, 1]`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spot: Real,
        texp: Time,
        vol: Volatility,
        rd: Rate,
        rf: Rate,
        scheme: BinomialScheme,
        steps: &TreeSteps,
    ) -> Result<Self> {
        ensure!(
            vol > 0.0 && texp > 0.0,
            "binomial tree needs positive volatility and expiry, got vol = {vol}, texp = {texp}"
        );
        let n = steps.steps_for(texp, vol)?;
        let grid = TimeGrid::uniform(texp, n)?;
        let dt = grid.dt();
        let growth = ((rd - rf) * dt).exp();

        let (up, down, p_up) = match scheme {
            BinomialScheme::MomentMatching => {
                let s = ((vol * vol * dt).exp() - 1.0).sqrt();
                (growth * (1.0 + s), growth * (1.0 - s), 0.5)
            }
            BinomialScheme::CoxRossRubinstein => {
                let c = 0.5 * ((-(rd - rf) * dt).exp() + ((rd - rf + vol * vol) * dt).exp());
                let down = c - (c * c - 1.0).sqrt();
                let up = 1.0 / down;
                (up, down, (growth - down) / (up - down))
            }
        };

        if !(down > 0.0 && up.is_finite()) {
            return Err(Error::NumericInstability(format!(
                "{scheme} tree: down factor {down} with up factor {up}"
            )));
        }
        if !(0.0..=1.0).contains(&p_up) {
            return Err(Error::NumericInstability(format!(
                "{scheme} tree: up probability {p_up} outside [0, 1]"
            )));
        }

        let mut up_powers = Vec::with_capacity(n + 1);
        let mut down_powers = Vec::with_capacity(n + 1);
        let (mut pu, mut pd) = (1.0, 1.0);
        for _ in 0..=n {
            up_powers.push(pu);
            down_powers.push(pd);
            pu *= up;
            pd *= down;
        }

        Ok(Self {
            spot,
            grid,
            up,
            down,
            p_up,
            discount: (-rd * dt).exp(),
            up_powers,
            down_powers,
        })
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Number of time steps.
    pub fn steps(&self) -> Size {
        self.grid.steps()
    }

    /// Time increment per step.
    pub fn dt(&self) -> Time {
        self.grid.dt()
    }

    /// Up factor.
    pub fn up(&self) -> Real {
        self.up
    }

    /// Down factor.
    pub fn down(&self) -> Real {
        self.down
    }

    /// Probability of an up move.
    pub fn probability_up(&self) -> Real {
        self.p_up
    }

    /// Per-step discount factor `e^{−rd·dt}`.
    pub fn discount(&self) -> DiscountFactor {
        self.discount
    }

    /// Number of nodes at time step `i`.
    pub fn size(&self, i: Size) -> Size {
        i + 1
    }

    /// Underlying value at node `(i, j)`.
    #[inline]
    pub fn underlying(&self, i: Size, j: Size) -> Real {
        self.spot * self.up_powers[j] * self.down_powers[i - j]
    }

    // ── Backward induction ───────────────────────────────────────────────

    /// Value an American option whose strike follows `schedule`.
    pub fn rollback_american(&self, option_type: OptionType, schedule: &StrikeSchedule) -> Real {
        let n = self.steps();
        let mut cursor = StrikeCursor::at_expiry(schedule, self.grid.end());
        let payoff = PlainVanillaPayoff::new(option_type, cursor.strike_at(self.grid.end()));

        let mut values: Vec<Real> = (0..self.size(n))
            .map(|j| payoff.value(self.underlying(n, j)))
            .collect();

        let (pu, pd) = (self.p_up, 1.0 - self.p_up);
        for i in (0..n).rev() {
            let payoff = PlainVanillaPayoff::new(option_type, cursor.strike_at(self.grid.time(i)));
            for j in 0..self.size(i) {
                let hold = self.discount * (pu * values[j + 1] + pd * values[j]);
                values[j] = hold.max(payoff.value(self.underlying(i, j)));
            }
            values.truncate(i + 1);
        }

        values[0]
    }

    /// Value a European option with a fixed strike.
    pub fn rollback_european(&self, option_type: OptionType, strike: Real) -> Real {
        let n = self.steps();
        let payoff = PlainVanillaPayoff::new(option_type, strike);
        let mut values: Vec<Real> = (0..self.size(n))
            .map(|j| payoff.value(self.underlying(n, j)))
            .collect();

        let (pu, pd) = (self.p_up, 1.0 - self.p_up);
        for i in (0..n).rev() {
            for j in 0..self.size(i) {
                values[j] = self.discount * (pu * values[j + 1] + pd * values[j]);
            }
        }
        values[0]
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
