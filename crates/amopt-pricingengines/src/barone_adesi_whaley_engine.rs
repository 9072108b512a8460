//! Barone-Adesi-Whaley American option approximation.
//!
//! Zeroth-order quadratic approximation: the American price is the European
//! price plus `h_A·(S/S_c)^λ`, continuous at the critical spot `S_c`.

use crate::quadratic_approximation::{approximate, Approximation, QuadraticApproximation};
use amopt_core::{errors::Result, Rate, Real, Time, Volatility};
use amopt_instruments::{OptionContract, OptionType, PricingEngine, PricingResults};
use amopt_math::{Brent, Solver1D};

/// Barone-Adesi-Whaley price with default settings.
///
/// # Errors
/// [`amopt_core::Error::NonConvergence`] when the critical spot search
/// fails.
pub fn barone_adesi_whaley_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
) -> Result<Real> {
    let config = QuadraticApproximation::default();
    barone_adesi_whaley_price_with(
        option_type,
        spot,
        strike,
        texp,
        vol,
        rd,
        rf,
        &config,
        &config.solver(),
    )
}

/// Barone-Adesi-Whaley price with explicit settings and root-finder.
#[allow(clippy::too_many_arguments)]
pub fn barone_adesi_whaley_price_with<S: Solver1D>(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
    config: &QuadraticApproximation,
    solver: &S,
) -> Result<Real> {
    let (price, _) = baw(option_type, spot, strike, texp, vol, rd, rf, config, solver)?;
    Ok(price)
}

#[allow(clippy::too_many_arguments)]
fn baw<S: Solver1D>(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
    config: &QuadraticApproximation,
    solver: &S,
) -> Result<(Real, Option<Real>)> {
    match approximate(option_type, spot, strike, texp, vol, rd, rf, config, solver)? {
        Approximation::Resolved {
            price,
            critical_spot,
        } => Ok((price, critical_spot)),
        Approximation::Premium(e) => {
            let premium = e.h_a * (spot / e.critical_spot).powf(e.exponent.lambda);
            Ok((e.european + premium, Some(e.critical_spot)))
        }
    }
}

/// Barone-Adesi-Whaley pricing engine.
///
/// Reports the critical spot in `additional_results["critical_spot"]` when
/// the exercise boundary is reachable.
#[derive(Debug, Clone, Default)]
pub struct BaroneAdesiWhaleyEngine<S = Brent> {
    config: QuadraticApproximation,
    solver: S,
}

impl BaroneAdesiWhaleyEngine {
    /// Engine with the given settings and a Brent solver at their accuracy.
    pub fn new(config: QuadraticApproximation) -> Self {
        Self {
            solver: config.solver(),
            config,
        }
    }
}

impl<S: Solver1D> BaroneAdesiWhaleyEngine<S> {
    /// Engine with an explicit root-finder.
    pub fn with_solver(config: QuadraticApproximation, solver: S) -> Self {
        Self { config, solver }
    }
}

impl<S> PricingEngine<OptionContract> for BaroneAdesiWhaleyEngine<S>
where
    S: Solver1D + std::fmt::Debug + Send + Sync,
{
    fn calculate(&self, args: &OptionContract) -> Result<PricingResults> {
        let (price, critical_spot) = baw(
            args.option_type(),
            args.spot(),
            args.strike(),
            args.expiry(),
            args.volatility(),
            args.domestic_rate(),
            args.foreign_rate(),
            &self.config,
            &self.solver,
        )?;
        let mut results = PricingResults::from_npv(price);
        if let Some(sc) = critical_spot {
            results = results.with_result("critical_spot", sc);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytic_european_engine::black_scholes_price;
    use amopt_math::Bisection;

    #[test]
    fn american_call_geq_european() {
        let (s, k, rd, rf, sigma, t) = (100.0, 100.0, 0.05, 0.08, 0.25, 1.0);
        let american = barone_adesi_whaley_price(OptionType::Call, s, k, t, sigma, rd, rf).unwrap();
        let european = black_scholes_price(OptionType::Call, s, k, t, sigma, rd, rf);
        assert!(american > european, "american={american}, european={european}");
    }

    #[test]
    fn american_put_close_to_lattice() {
        // Lattice reference ≈ 6.090; the quadratic approximation lands near it.
        let p = barone_adesi_whaley_price(OptionType::Put, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0)
            .unwrap();
        let euro = black_scholes_price(OptionType::Put, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0);
        assert!(p > euro, "american={p}, european={euro}");
        assert!((p - 6.09).abs() < 0.15, "price = {p}");
    }

    #[test]
    fn deep_itm_put_is_intrinsic() {
        let p = barone_adesi_whaley_price(OptionType::Put, 50.0, 100.0, 1.0, 0.25, 0.10, 0.0)
            .unwrap();
        assert_eq!(p, 50.0);
    }

    #[test]
    fn american_call_no_yield_equals_european() {
        let american =
            barone_adesi_whaley_price(OptionType::Call, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0).unwrap();
        let european = black_scholes_price(OptionType::Call, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0);
        assert_eq!(american, european);
    }

    fn put_with<S: Solver1D>(solver: &S) -> Real {
        let cfg = QuadraticApproximation::default();
        barone_adesi_whaley_price_with(
            OptionType::Put,
            95.0,
            100.0,
            0.5,
            0.3,
            0.06,
            0.01,
            &cfg,
            solver,
        )
        .unwrap()
    }

    #[test]
    fn solver_choice_does_not_change_price() {
        let brent = put_with(&Brent::default());
        let bisection = put_with(&Bisection::default());
        assert!((brent - bisection).abs() < 1e-8);
    }

    #[test]
    fn engine_reports_critical_spot() {
        let contract =
            OptionContract::new(OptionType::Put, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0).unwrap();
        let r = BaroneAdesiWhaleyEngine::new(QuadraticApproximation::default())
            .calculate(&contract)
            .unwrap();
        let sc = r.result("critical_spot").unwrap();
        assert!(sc < 100.0 && sc > 50.0);
    }
}
