//! American options on a trinomial lattice, with time-varying strikes.

use crate::analytic_european_engine::black_scholes_price;
use amopt_core::{errors::Result, Rate, Real, Time, Volatility};
use amopt_instruments::{OptionContract, OptionType, PricingEngine, PricingResults, StrikeSchedule};
use amopt_methods::{TreeSteps, TrinomialTree};

/// American option price on a recombining trinomial tree.
///
/// Same conventions as [`crate::binomial_tree_price`]. Fails with
/// [`amopt_core::Error::NumericInstability`] when `σ²·dt ≥ ln 3`.
#[allow(clippy::too_many_arguments)]
pub fn trinomial_tree_price(
    option_type: OptionType,
    spot: Real,
    schedule: &StrikeSchedule,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
    steps: TreeSteps,
) -> Result<Real> {
    if vol <= 0.0 || texp <= 0.0 {
        steps.validate()?;
        let strike = schedule.last_strike();
        return Ok(black_scholes_price(option_type, spot, strike, texp, vol, rd, rf));
    }
    let tree = TrinomialTree::new(spot, texp, vol, rd, rf, &steps)?;
    Ok(tree.rollback_american(option_type, schedule))
}

/// Trinomial-tree engine for American options with a fixed strike.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrinomialEngine {
    /// Step-count bounds.
    pub steps: TreeSteps,
}

impl TrinomialEngine {
    /// Engine with the given step bounds.
    pub fn new(steps: TreeSteps) -> Self {
        Self { steps }
    }
}

impl PricingEngine<OptionContract> for TrinomialEngine {
    fn calculate(&self, args: &OptionContract) -> Result<PricingResults> {
        let price = trinomial_tree_price(
            args.option_type(),
            args.spot(),
            &StrikeSchedule::constant(args.strike()),
            args.expiry(),
            args.volatility(),
            args.domestic_rate(),
            args.foreign_rate(),
            self.steps,
        )?;
        Ok(PricingResults::from_npv(price))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn american_put_reference() {
        let contract =
            OptionContract::new(OptionType::Put, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0).unwrap();
        let r = TrinomialEngine::default().calculate(&contract).unwrap();
        assert_abs_diff_eq!(r.npv, 6.090, epsilon = 0.01);
    }

    #[test]
    fn zero_expiry_is_intrinsic() {
        let p = trinomial_tree_price(
            OptionType::Put,
            90.0,
            &StrikeSchedule::constant(100.0),
            0.0,
            0.2,
            0.05,
            0.0,
            TreeSteps::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(p, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_uses_last_scheduled_strike() {
        let schedule = StrikeSchedule::new(vec![(90.0, 1.0), (100.0, 2.0)]).unwrap();
        let call = trinomial_tree_price(
            OptionType::Call,
            100.0,
            &schedule,
            1.0,
            0.0,
            0.05,
            0.0,
            TreeSteps::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(call, 100.0 - 100.0 * (-0.05f64).exp(), epsilon = 1e-12);

        let schedule = StrikeSchedule::new(vec![(90.0, 0.5), (100.0, 1.0)]).unwrap();
        let put = trinomial_tree_price(
            OptionType::Put,
            95.0,
            &schedule,
            0.0,
            0.2,
            0.05,
            0.0,
            TreeSteps::default(),
        )
        .unwrap();
        assert_abs_diff_eq!(put, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn split_schedule_with_equal_strikes_matches_constant() {
        let price = |schedule: &StrikeSchedule| {
            trinomial_tree_price(OptionType::Call, 100.0, schedule, 1.0, 0.3, 0.03, 0.05, TreeSteps::default())
                .unwrap()
        };
        let single = price(&StrikeSchedule::new(vec![(95.0, 1.0)]).unwrap());
        let split = price(&StrikeSchedule::new(vec![(95.0, 0.3), (95.0, 0.7), (95.0, 1.0)]).unwrap());
        assert_abs_diff_eq!(single, split, epsilon = 1e-12);
    }

    #[test]
    fn unstable_step_variance_is_an_error() {
        let r = trinomial_tree_price(
            OptionType::Put,
            100.0,
            &StrikeSchedule::constant(100.0),
            1.0,
            1.2,
            0.05,
            0.0,
            TreeSteps::new(1, 1).unwrap(),
        );
        assert!(matches!(r, Err(amopt_core::Error::NumericInstability(_))));
    }
}
