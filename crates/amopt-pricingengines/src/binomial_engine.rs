//! American options on a binomial lattice, with time-varying strikes.

use crate::analytic_european_engine::black_scholes_price;
use amopt_core::{errors::Result, Rate, Real, Time, Volatility};
use amopt_instruments::{OptionContract, OptionType, PricingEngine, PricingResults, StrikeSchedule};
use amopt_methods::{BinomialScheme, BinomialTree, TreeSteps};

/// American option price on a recombining binomial tree.
///
/// The strike follows `schedule`. With `vol <= 0` or `texp <= 0` the tree
/// collapses and the European price at the last scheduled strike is
/// returned.
///
/// # Errors
/// [`amopt_core::Error::InvalidArgument`] for bad `steps` bounds and
/// [`amopt_core::Error::NumericInstability`] when the scheme yields a
/// non-positive down factor or a probability outside `[0, 1]`.
#[allow(clippy::too_many_arguments)]
pub fn binomial_tree_price(
    option_type: OptionType,
    spot: Real,
    schedule: &StrikeSchedule,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
    scheme: BinomialScheme,
    steps: TreeSteps,
) -> Result<Real> {
    if vol <= 0.0 || texp <= 0.0 {
        steps.validate()?;
        let strike = schedule.last_strike();
        return Ok(black_scholes_price(option_type, spot, strike, texp, vol, rd, rf));
    }
    let tree = BinomialTree::new(spot, texp, vol, rd, rf, scheme, &steps)?;
    Ok(tree.rollback_american(option_type, schedule))
}

/// Binomial-tree engine for American options with a fixed strike.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinomialEngine {
    /// Up/down factor parameterisation.
    pub scheme: BinomialScheme,
    /// Step-count bounds.
    pub steps: TreeSteps,
}

impl BinomialEngine {
    /// Engine with the given scheme and default step bounds.
    pub fn new(scheme: BinomialScheme) -> Self {
        Self {
            scheme,
            steps: TreeSteps::default(),
        }
    }

    /// Replace the step bounds.
    pub fn with_steps(mut self, steps: TreeSteps) -> Self {
        self.steps = steps;
        self
    }
}

impl PricingEngine<OptionContract> for BinomialEngine {
    fn calculate(&self, args: &OptionContract) -> Result<PricingResults> {
        let price = binomial_tree_price(
            args.option_type(),
            args.spot(),
            &StrikeSchedule::constant(args.strike()),
            args.expiry(),
            args.volatility(),
            args.domestic_rate(),
            args.foreign_rate(),
            self.scheme,
            self.steps,
        )?;
        Ok(PricingResults::from_npv(price))
    }
}
