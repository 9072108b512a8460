//! Analytic European option engine (Black-Scholes with a foreign yield).
//!
//! Every American pricer in this crate falls back to [`black_scholes_price`]
//! in its degenerate cases, and the quadratic approximations evaluate it
//! inside their boundary searches.

use amopt_core::{errors::Result, Rate, Real, Time, Volatility};
use amopt_instruments::{OptionContract, OptionType, PricingEngine, PricingResults};
use amopt_math::distributions::{normal_cdf, normal_pdf};

/// `(d1, d2)` for a positive strike and positive `vol·√T`.
#[inline]
pub(crate) fn d1_d2(
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
) -> (Real, Real) {
    let std_dev = vol * texp.sqrt();
    let d1 = ((spot / strike).ln() + (rd - rf + 0.5 * vol * vol) * texp) / std_dev;
    (d1, d1 - std_dev)
}

/// Black-Scholes price of a European option.
///
/// $$C = S e^{-r_f T} N(d_1) - K e^{-r_d T} N(d_2)$$
/// $$P = K e^{-r_d T} N(-d_2) - S e^{-r_f T} N(-d_1)$$
///
/// The function is total. When `vol·√T` is zero (or negative) it returns
/// the discounted forward intrinsic value
/// `max(φ(S e^{-r_f T} − K e^{-r_d T}), 0)`; a non-positive strike gives
/// `S e^{-r_f T} − K e^{-r_d T}` for a call and `0` for a put.
pub fn black_scholes_price(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
) -> Real {
    let phi = option_type.sign();
    let t = texp.max(0.0);
    let fwd_spot = spot * (-rf * t).exp();
    let pv_strike = strike * (-rd * t).exp();

    if strike <= 0.0 {
        return match option_type {
            OptionType::Call => fwd_spot - pv_strike,
            OptionType::Put => 0.0,
        };
    }

    let std_dev = vol * t.sqrt();
    if !(std_dev > 0.0) {
        return (phi * (fwd_spot - pv_strike)).max(0.0);
    }

    let (d1, d2) = d1_d2(spot, strike, t, vol, rd, rf);
    phi * (fwd_spot * normal_cdf(phi * d1) - pv_strike * normal_cdf(phi * d2))
}

/// Analytic pricing engine for European options.
///
/// Reports `delta` and `vega` alongside the NPV when the option has a
/// positive strike and a non-zero `vol·√T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEuropeanEngine;

impl AnalyticEuropeanEngine {
    /// Create a new engine.
    pub fn new() -> Self {
        Self
    }
}

impl PricingEngine<OptionContract> for AnalyticEuropeanEngine {
    fn calculate(&self, args: &OptionContract) -> Result<PricingResults> {
        let (s, k, t) = (args.spot(), args.strike(), args.expiry());
        let (vol, rd, rf) = (args.volatility(), args.domestic_rate(), args.foreign_rate());
        let price = black_scholes_price(args.option_type(), s, k, t, vol, rd, rf);
        let mut results = PricingResults::from_npv(price);

        if k > 0.0 && vol * t.sqrt() > 0.0 {
            let phi = args.option_type().sign();
            let (d1, _) = d1_d2(s, k, t, vol, rd, rf);
            let df_f = (-rf * t).exp();
            results = results
                .with_result("delta", phi * df_f * normal_cdf(phi * d1))
                .with_result("vega", s * df_f * normal_pdf(d1) * t.sqrt());
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn bs_call_price() {
        // S=100, K=100, r=5%, q=0%, σ=20%, T=1
        let price = black_scholes_price(OptionType::Call, 100.0, 100.0, 1.0, 0.20, 0.05, 0.0);
        assert_abs_diff_eq!(price, 10.450_583_572_185_565, epsilon = 1e-9);
    }

    #[test]
    fn bs_put_call_parity_with_yield() {
        let (s, k, rd, rf, sigma, t) = (100.0, 105.0, 0.08, 0.03, 0.25, 0.5);
        let call = black_scholes_price(OptionType::Call, s, k, t, sigma, rd, rf);
        let put = black_scholes_price(OptionType::Put, s, k, t, sigma, rd, rf);
        let parity = call - s * (-rf * t).exp() + k * (-rd * t).exp();
        assert_abs_diff_eq!(put, parity, epsilon = 1e-10);
    }

    #[test]
    fn bs_deep_otm_put() {
        let price = black_scholes_price(OptionType::Put, 200.0, 100.0, 1.0, 0.20, 0.05, 0.0);
        assert!(price < 1e-3, "price = {price}");
    }

    #[test]
    fn zero_vol_is_discounted_forward_intrinsic() {
        let price = black_scholes_price(OptionType::Call, 100.0, 95.0, 1.0, 0.0, 0.05, 0.0);
        assert_abs_diff_eq!(price, 100.0 - 95.0 * (-0.05_f64).exp(), epsilon = 1e-12);
        let put = black_scholes_price(OptionType::Put, 100.0, 95.0, 1.0, 0.0, 0.05, 0.0);
        assert_eq!(put, 0.0);
    }

    #[test]
    fn zero_expiry_is_intrinsic() {
        let put = black_scholes_price(OptionType::Put, 90.0, 100.0, 0.0, 0.3, 0.05, 0.01);
        assert_abs_diff_eq!(put, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn non_positive_strike() {
        let call = black_scholes_price(OptionType::Call, 100.0, 0.0, 1.0, 0.2, 0.05, 0.02);
        assert_abs_diff_eq!(call, 100.0 * (-0.02_f64).exp(), epsilon = 1e-12);
        assert_eq!(
            black_scholes_price(OptionType::Put, 100.0, -1.0, 1.0, 0.2, 0.05, 0.0),
            0.0
        );
    }

    #[test]
    fn engine_reports_greeks() {
        let contract =
            OptionContract::new(OptionType::Call, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0).unwrap();
        let r = AnalyticEuropeanEngine::new().calculate(&contract).unwrap();
        assert_abs_diff_eq!(r.npv, 10.450_583_572_185_565, epsilon = 1e-9);
        let delta = r.result("delta").unwrap();
        assert!(delta > 0.5 && delta < 0.8, "delta = {delta}");
        assert!(r.result("vega").unwrap() > 0.0);

        let expired = OptionContract::new(OptionType::Call, 100.0, 90.0, 0.0, 0.2, 0.05, 0.0).unwrap();
        let r = AnalyticEuropeanEngine::new().calculate(&expired).unwrap();
        assert_abs_diff_eq!(r.npv, 10.0, epsilon = 1e-12);
        assert!(r.result("delta").is_none());
    }
}
