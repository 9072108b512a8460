//! Piecewise-constant strike schedules.
//!
//! A schedule is a list of `(strike, breakpoint)` pairs. Breakpoint `k` is
//! the end of the interval on which `strike[k]` applies: `strike[0]` holds on
//! `[0, time[0]]`, `strike[1]` on `(time[0], time[1]]`, and so on. A final
//! breakpoint before expiry is treated as covering the rest of the life of
//! the option.

use amopt_core::{
    ensure,
    errors::{Error, Result},
    Real, Time,
};

/// Time-varying strike, piecewise constant between breakpoints.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<(Real, Time)>", into = "Vec<(Real, Time)>")
)]
pub struct StrikeSchedule {
    strikes: Vec<Real>,
    times: Vec<Time>,
}

impl StrikeSchedule {
    /// Build a schedule from `(strike, breakpoint_time)` pairs.
    ///
    /// Fails with [`Error::InvalidArgument`] for an empty list, a NaN or
    /// infinite strike, a NaN time, or breakpoints that are not strictly
    /// increasing.
    pub fn new(entries: Vec<(Real, Time)>) -> Result<Self> {
        ensure!(!entries.is_empty(), "strike schedule must not be empty");
        let (strikes, times): (Vec<Real>, Vec<Time>) = entries.into_iter().unzip();
        ensure!(
            strikes.iter().all(|k| k.is_finite()),
            "strike schedule contains a non-finite strike: {strikes:?}"
        );
        ensure!(
            !times.iter().any(|t| t.is_nan()),
            "strike schedule contains a NaN breakpoint"
        );
        ensure!(
            times.windows(2).all(|w| w[1] > w[0]),
            "strike schedule breakpoints must be strictly increasing, got {times:?}"
        );
        Ok(Self { strikes, times })
    }

    /// A single strike applying at all times.
    pub fn constant(strike: Real) -> Self {
        Self {
            strikes: vec![strike],
            times: vec![Time::INFINITY],
        }
    }

    /// Strikes, one per segment.
    pub fn strikes(&self) -> &[Real] {
        &self.strikes
    }

    /// Breakpoint times, one per segment.
    pub fn times(&self) -> &[Time] {
        &self.times
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Always `false`: construction rejects empty schedules.
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Index of the segment in force at expiry `texp`: the first breakpoint
    /// at or after `texp`, or the last segment if every breakpoint is
    /// earlier.
    pub fn segment_at_expiry(&self, texp: Time) -> usize {
        self.times
            .iter()
            .position(|&t| t >= texp)
            .unwrap_or(self.times.len() - 1)
    }

    /// Strike of the last scheduled segment.
    pub fn last_strike(&self) -> Real {
        self.strikes[self.strikes.len() - 1]
    }
}

impl TryFrom<Vec<(Real, Time)>> for StrikeSchedule {
    type Error = Error;

    fn try_from(entries: Vec<(Real, Time)>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<StrikeSchedule> for Vec<(Real, Time)> {
    fn from(s: StrikeSchedule) -> Self {
        s.strikes.into_iter().zip(s.times).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_and_accessors() {
        let s = StrikeSchedule::new(vec![(90.0, 0.5), (100.0, 1.0)]).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.strikes(), &[90.0, 100.0]);
        assert_eq!(s.times(), &[0.5, 1.0]);
        assert!(!s.is_empty());
    }

    #[test]
    fn rejects_malformed_schedules() {
        assert!(StrikeSchedule::new(vec![]).is_err());
        assert!(StrikeSchedule::new(vec![(f64::NAN, 1.0)]).is_err());
        assert!(StrikeSchedule::new(vec![(100.0, f64::NAN)]).is_err());
        assert!(StrikeSchedule::new(vec![(100.0, 1.0), (90.0, 1.0)]).is_err());
        assert!(StrikeSchedule::new(vec![(100.0, 1.0), (90.0, 0.5)]).is_err());
    }

    #[test]
    fn segment_at_expiry() {
        let s = StrikeSchedule::new(vec![(90.0, 0.25), (95.0, 0.5), (100.0, 1.0)]).unwrap();
        assert_eq!(s.segment_at_expiry(0.1), 0);
        assert_eq!(s.segment_at_expiry(0.5), 1);
        assert_eq!(s.segment_at_expiry(0.75), 2);
        // Past the last breakpoint the last segment covers to expiry.
        assert_eq!(s.segment_at_expiry(2.0), 2);
    }

    #[test]
    fn last_strike_ignores_expiry() {
        let s = StrikeSchedule::new(vec![(90.0, 1.0), (100.0, 2.0)]).unwrap();
        assert_eq!(s.segment_at_expiry(1.0), 0);
        assert_eq!(s.last_strike(), 100.0);
    }

    #[test]
    fn constant_schedule_covers_everything() {
        let s = StrikeSchedule::constant(105.0);
        assert_eq!(s.segment_at_expiry(0.0), 0);
        assert_eq!(s.segment_at_expiry(30.0), 0);
        assert_eq!(s.last_strike(), 105.0);
    }

    #[test]
    fn round_trips_through_pairs() {
        let pairs = vec![(90.0, 0.5), (100.0, 1.0)];
        let s = StrikeSchedule::try_from(pairs.clone()).unwrap();
        assert_eq!(Vec::<(Real, Time)>::from(s), pairs);
    }
}
