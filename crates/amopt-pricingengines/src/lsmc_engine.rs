//! Least-squares Monte Carlo engine for American options.

use amopt_core::{errors::Result, Rate, Real, Time, Volatility};
use amopt_instruments::{OptionContract, OptionType, PlainVanillaPayoff, PricingEngine, PricingResults};
use amopt_methods::{longstaff_schwartz, LsmcConfig, LsmcResult};

/// Longstaff-Schwartz price of an American option under GBM with a single
/// rate `r` for both drift and discounting.
///
/// # Errors
/// [`amopt_core::Error::InvalidArgument`] for an empty simulation, an odd
/// path count with antithetic sampling, or invalid market inputs.
pub fn least_squares_monte_carlo(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    r: Rate,
    sigma: Volatility,
    config: &LsmcConfig,
) -> Result<LsmcResult> {
    let payoff = PlainVanillaPayoff::new(option_type, strike);
    longstaff_schwartz(&payoff, spot, texp, r, r, sigma, config)
}

/// Least-squares Monte Carlo engine. Paths drift at `r_d − r_f` and are
/// discounted at `r_d`; the standard error is reported as the error
/// estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LsmcEngine {
    /// Simulation and regression settings.
    pub config: LsmcConfig,
}

impl LsmcEngine {
    /// Engine with the given settings.
    pub fn new(config: LsmcConfig) -> Self {
        Self { config }
    }
}

impl PricingEngine<OptionContract> for LsmcEngine {
    fn calculate(&self, args: &OptionContract) -> Result<PricingResults> {
        let rd = args.domestic_rate();
        let result = longstaff_schwartz(
            &args.payoff(),
            args.spot(),
            args.expiry(),
            rd - args.foreign_rate(),
            rd,
            args.volatility(),
            &self.config,
        )?;
        Ok(PricingResults::from_npv(result.price).with_error_estimate(result.std_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic_european_engine::black_scholes_price;

    #[test]
    fn deep_otm_put_without_volatility_is_worthless() {
        let cfg = LsmcConfig::default().with_paths(200).with_steps(20);
        let r = least_squares_monte_carlo(OptionType::Put, 200.0, 100.0, 1.0, 0.05, 0.0, &cfg)
            .unwrap();
        assert_eq!(r.price, 0.0);
    }

    #[test]
    fn deep_itm_put_without_volatility_is_intrinsic() {
        let cfg = LsmcConfig::default().with_paths(200).with_steps(100);
        let r = least_squares_monte_carlo(OptionType::Put, 10.0, 100.0, 1.0, 0.05, 0.0, &cfg)
            .unwrap();
        assert!((r.price - 90.0).abs() < 0.1, "price = {}", r.price);
    }

    #[test]
    fn engine_uses_carry_and_reports_error() {
        let contract =
            OptionContract::new(OptionType::Call, 100.0, 100.0, 1.0, 0.2, 0.03, 0.08).unwrap();
        let cfg = LsmcConfig::default().with_paths(10_000).with_steps(25);
        let r = LsmcEngine::new(cfg).calculate(&contract).unwrap();
        let se = r.error_estimate.unwrap();
        assert!(se > 0.0 && se < 0.2);
        let euro = black_scholes_price(OptionType::Call, 100.0, 100.0, 1.0, 0.2, 0.03, 0.08);
        assert!(r.npv > euro - 3.0 * se, "npv = {}, european = {euro}", r.npv);
    }
}
