//! Lattice methods for American option pricing.
//!
//! # Overview
//!
//! * [`BinomialTree`]: recombining binomial tree, moment-matching or
//!   Cox-Ross-Rubinstein factors
//! * [`TrinomialTree`]: recombining trinomial tree with equal branch
//!   probabilities
//! * [`TreeSteps`]: step-count policy shared by both trees
//! * [`StrikeCursor`]: walks a [`StrikeSchedule`] backwards in time during
//!   backward induction

pub mod binomial_tree;
pub mod trinomial_tree;

pub use binomial_tree::{BinomialScheme, BinomialTree};
pub use trinomial_tree::TrinomialTree;

use amopt_core::{ensure, errors::Result, Real, Size, Time};
use amopt_instruments::StrikeSchedule;

/// Target variance per step: `dt ≈ 1e-5 / vol²`.
pub const VARIANCE_PER_STEP: Real = 1.0e-5;

/// Two times closer than this are treated as the same instant when the
/// strike cursor crosses a breakpoint.
pub const BREAKPOINT_TOLERANCE: Time = 1.0e-12;

// ─── TreeSteps ────────────────────────────────────────────────────────────────

/// Bounds on the number of lattice time steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeSteps {
    /// Lower bound on the step count.
    pub n_steps_min: Size,
    /// Upper bound on the step count.
    pub n_steps_max: Size,
}

impl Default for TreeSteps {
    fn default() -> Self {
        Self {
            n_steps_min: 30,
            n_steps_max: 1000,
        }
    }
}

impl TreeSteps {
    /// Validated step bounds.
    pub fn new(n_steps_min: Size, n_steps_max: Size) -> Result<Self> {
        let steps = Self {
            n_steps_min,
            n_steps_max,
        };
        steps.validate()?;
        Ok(steps)
    }

    /// Replace the lower bound.
    pub fn with_min(mut self, n_steps_min: Size) -> Self {
        self.n_steps_min = n_steps_min;
        self
    }

    /// Replace the upper bound.
    pub fn with_max(mut self, n_steps_max: Size) -> Self {
        self.n_steps_max = n_steps_max;
        self
    }

    /// `n_steps_min` must be positive and not above `n_steps_max`.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_steps_min > 0, "n_steps_min must be at least 1");
        ensure!(
            self.n_steps_min <= self.n_steps_max,
            "n_steps_min ({}) exceeds n_steps_max ({})",
            self.n_steps_min,
            self.n_steps_max
        );
        Ok(())
    }

    /// Step count for expiry `texp` and volatility `vol`:
    /// `clamp(floor(texp · vol² / 1e-5), min, max)`.
    pub fn steps_for(&self, texp: Time, vol: Real) -> Result<Size> {
        self.validate()?;
        let raw = (texp * vol * vol / VARIANCE_PER_STEP).floor();
        let n = if raw.is_nan() {
            self.n_steps_min
        } else {
            raw.clamp(self.n_steps_min as Real, self.n_steps_max as Real) as Size
        };
        tracing::debug!(texp, vol, n, "lattice step count");
        Ok(n)
    }
}

// ─── TimeGrid ─────────────────────────────────────────────────────────────────

/// Uniform grid of `steps + 1` time points on `[0, end]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    end: Time,
    steps: Size,
}

impl TimeGrid {
    /// Uniform grid from 0 to `end` with `steps` intervals.
    pub fn uniform(end: Time, steps: Size) -> Result<Self> {
        ensure!(steps > 0, "time grid needs at least one step");
        ensure!(
            end.is_finite() && end > 0.0,
            "time grid end must be positive, got {end}"
        );
        Ok(Self { end, steps })
    }

    /// Number of steps (= time points − 1).
    pub fn steps(&self) -> Size {
        self.steps
    }

    /// Step length.
    pub fn dt(&self) -> Time {
        self.end / self.steps as Real
    }

    /// Time at index `i`.
    pub fn time(&self, i: Size) -> Time {
        if i == self.steps {
            self.end
        } else {
            i as Real * self.dt()
        }
    }

    /// Final time.
    pub fn end(&self) -> Time {
        self.end
    }
}

// ─── StrikeCursor ─────────────────────────────────────────────────────────────

/// Position in a [`StrikeSchedule`] during backward induction.
///
/// Starts on the segment in force at expiry and only ever moves back. At
/// time `t` it steps to the previous segment while `t` is at or before the
/// previous breakpoint (within [`BREAKPOINT_TOLERANCE`]).
#[derive(Debug, Clone)]
pub struct StrikeCursor<'a> {
    schedule: &'a StrikeSchedule,
    idx: usize,
}

impl<'a> StrikeCursor<'a> {
    /// Cursor on the segment in force at expiry `texp`.
    pub fn at_expiry(schedule: &'a StrikeSchedule, texp: Time) -> Self {
        Self {
            schedule,
            idx: schedule.segment_at_expiry(texp),
        }
    }

    /// Strike in force at `t`, moving the cursor back as needed.
    pub fn strike_at(&mut self, t: Time) -> Real {
        let times = self.schedule.times();
        while self.idx > 0 && t - times[self.idx - 1] < BREAKPOINT_TOLERANCE {
            self.idx -= 1;
        }
        self.schedule.strikes()[self.idx]
    }

    /// Current segment index.
    pub fn index(&self) -> usize {
        self.idx
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn default_steps() {
        let s = TreeSteps::default();
        assert_eq!((s.n_steps_min, s.n_steps_max), (30, 1000));
    }

    #[test]
    fn steps_are_clamped() {
        let s = TreeSteps::default();
        // 1 * 0.04 / 1e-5 = 4000 -> capped
        assert_eq!(s.steps_for(1.0, 0.2).unwrap(), 1000);
        // 0.01 * 0.0001 / 1e-5 = 0.1 -> floored at the minimum
        assert_eq!(s.steps_for(0.01, 0.01).unwrap(), 30);
        // 1 * 0.0025 / 1e-5 = 250
        assert_eq!(s.steps_for(1.0, 0.05).unwrap(), 250);
    }

    #[test]
    fn invalid_bounds() {
        assert!(TreeSteps::new(0, 10).is_err());
        assert!(TreeSteps::new(20, 10).is_err());
        assert!(TreeSteps::default().with_min(0).steps_for(1.0, 0.2).is_err());
        assert!(TreeSteps::new(10, 10).is_ok());
    }

    #[test]
    fn time_grid_uniform() {
        let g = TimeGrid::uniform(1.0, 4).unwrap();
        assert_eq!(g.steps(), 4);
        assert_abs_diff_eq!(g.time(0), 0.0, epsilon = 1e-15);
        assert_eq!(g.time(4), 1.0);
        assert_abs_diff_eq!(g.dt(), 0.25, epsilon = 1e-15);
        assert!(TimeGrid::uniform(1.0, 0).is_err());
        assert!(TimeGrid::uniform(0.0, 4).is_err());
    }

    #[test]
    fn cursor_walks_back_through_breakpoints() {
        let s = StrikeSchedule::new(vec![(90.0, 0.25), (95.0, 0.5), (100.0, 1.0)]).unwrap();
        let mut c = StrikeCursor::at_expiry(&s, 1.0);
        assert_eq!(c.strike_at(1.0), 100.0);
        assert_eq!(c.strike_at(0.75), 100.0);
        // A step exactly on a breakpoint belongs to the segment ending there.
        assert_eq!(c.strike_at(0.5), 95.0);
        assert_eq!(c.strike_at(0.3), 95.0);
        assert_eq!(c.strike_at(0.25 + 1e-13), 90.0);
        assert_eq!(c.strike_at(0.0), 90.0);
        assert_eq!(c.index(), 0);
    }

    #[test]
    fn cursor_skips_several_breakpoints_in_one_step() {
        let s = StrikeSchedule::new(vec![(80.0, 0.1), (90.0, 0.2), (100.0, 1.0)]).unwrap();
        let mut c = StrikeCursor::at_expiry(&s, 1.0);
        assert_eq!(c.strike_at(0.05), 80.0);
    }

    #[test]
    fn cursor_with_short_schedule() {
        // Last breakpoint before expiry covers the remaining time.
        let s = StrikeSchedule::new(vec![(90.0, 0.25), (100.0, 0.5)]).unwrap();
        let mut c = StrikeCursor::at_expiry(&s, 1.0);
        assert_eq!(c.strike_at(1.0), 100.0);
        assert_eq!(c.strike_at(0.2), 90.0);
    }
}
