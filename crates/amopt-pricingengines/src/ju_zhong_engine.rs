//! Ju-Zhong American option approximation and its implied volatility.
//!
//! Refines the Barone-Adesi-Whaley premium by dividing it by `1 − ξ`,
//! where `ξ = b·ln²(S/S_c) + c·ln(S/S_c)` is the second-order correction of
//! Ju & Zhong (1999).
//!
//! The correction is only defined for a positive domestic rate. At or below
//! the zero-rate floor, and wherever `1 − ξ <= 0`, the zeroth-order premium
//! is used instead.

use crate::quadratic_approximation::{
    approximate, Approximation, EarlyExercise, QuadraticApproximation,
};
use amopt_core::{
    errors::{Error, Result},
    Rate, Real, Time, Volatility,
};
use amopt_instruments::{OptionContract, OptionType, PricingEngine, PricingResults};
use amopt_math::{normal_cdf, normal_pdf, Brent, Solver1D};

/// Volatility search interval of [`ju_zhong_implied_volatility`].
const IMPLIED_VOL_BRACKET: (Volatility, Volatility) = (1.0e-4, 5.0);

/// Ju-Zhong price with default settings.
///
/// # Errors
/// [`Error::NonConvergence`] when the critical spot search fails and
/// [`Error::NumericInstability`] when the correction `ξ` is not finite.
pub fn ju_zhong_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
) -> Result<Real> {
    let config = QuadraticApproximation::default();
    ju_zhong_price_with(
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

/// Ju-Zhong price with explicit settings and root-finder.
#[allow(clippy::too_many_arguments)]
pub fn ju_zhong_price_with<S: Solver1D>(
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
    let (price, _) = jz(option_type, spot, strike, texp, vol, rd, rf, config, solver)?;
    Ok(price)
}

#[allow(clippy::too_many_arguments)]
fn jz<S: Solver1D>(
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
        Approximation::Premium(e) => Ok((corrected_price(&e, config)?, Some(e.critical_spot))),
    }
}

fn corrected_price(e: &EarlyExercise, config: &QuadraticApproximation) -> Result<Real> {
    let q = &e.inputs;
    let x = &e.exponent;
    let (phi, sc, rd, rf, vol, t) = (q.phi, e.critical_spot, q.rd, q.rf, q.vol, q.texp);
    let premium = e.h_a * (q.spot / sc).powf(x.lambda);
    if rd <= config.zero_rate_floor {
        tracing::debug!(rd, "no Ju-Zhong correction at this rate, using zeroth-order premium");
        return Ok(e.european + premium);
    }
    let sqrt_t = t.sqrt();

    let d_lambda = -phi * x.alpha / (x.h * x.h) / x.lam_arg;
    let (d1, d2) = q.d1_d2(sc);
    let carry = ((rd - rf) * t).exp();
    let dv_dh = sc * normal_pdf(d1) * vol * carry / (2.0 * rd * sqrt_t)
        - phi * rf * sc * normal_cdf(phi * d1) * carry / rd
        + phi * q.strike * normal_cdf(phi * d2);

    let denom = 2.0 * x.lambda + x.beta - 1.0;
    let b = (1.0 - x.h) * x.alpha * d_lambda / (2.0 * denom);
    let c = -(1.0 - x.h) * x.alpha / denom * (dv_dh / e.h_a + 1.0 / x.h + d_lambda / denom);

    let sl = (q.spot / sc).ln();
    let xi = b * sl * sl + c * sl;
    if !xi.is_finite() {
        return Err(Error::NumericInstability(format!("Ju-Zhong correction xi = {xi}")));
    }
    let one_minus_xi = 1.0 - xi;
    if one_minus_xi <= 0.0 {
        tracing::debug!(xi, "Ju-Zhong correction out of range, using zeroth-order premium");
        return Ok(e.european + premium);
    }

    Ok(e.european + premium / one_minus_xi)
}

/// Volatility at which [`ju_zhong_price`] matches `target_price`.
///
/// Returns `0` when the target does not exceed `φ(S − K)`. Otherwise the
/// volatility is searched on `[1e-4, 5]` with Brent's method.
///
/// # Errors
/// [`Error::NonConvergence`] when the target is not attainable on the
/// search interval; pricing errors met during the search are propagated.
pub fn ju_zhong_implied_volatility(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    rd: Rate,
    rf: Rate,
    target_price: Real,
) -> Result<Volatility> {
    let intrinsic = option_type.sign() * (spot - strike);
    if target_price <= intrinsic {
        return Ok(0.0);
    }
    let (lo, hi) = IMPLIED_VOL_BRACKET;
    Brent::default().try_solve(
        |vol| Ok(ju_zhong_price(option_type, spot, strike, texp, vol, rd, rf)? - target_price),
        lo,
        hi,
    )
}

/// Ju-Zhong pricing engine.
///
/// Reports the critical spot in `additional_results["critical_spot"]` when
/// the exercise boundary is reachable.
#[derive(Debug, Clone, Default)]
pub struct JuZhongEngine<S = Brent> {
    config: QuadraticApproximation,
    solver: S,
}

impl JuZhongEngine {
    /// Engine with the given settings and a Brent solver at their accuracy.
    pub fn new(config: QuadraticApproximation) -> Self {
        Self {
            solver: config.solver(),
            config,
        }
    }
}

impl<S: Solver1D> JuZhongEngine<S> {
    /// Engine with an explicit root-finder.
    pub fn with_solver(config: QuadraticApproximation, solver: S) -> Self {
        Self { config, solver }
    }
}

impl<S> PricingEngine<OptionContract> for JuZhongEngine<S>
where
    S: Solver1D + std::fmt::Debug + Send + Sync,
{
    fn calculate(&self, args: &OptionContract) -> Result<PricingResults> {
        let (price, critical_spot) = jz(
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
