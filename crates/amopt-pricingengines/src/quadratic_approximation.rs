//! Shared machinery of the quadratic (Barone-Adesi-Whaley family)
//! early-exercise approximations.
//!
//! The American price is written as the European price plus a premium
//! `h_A·(S/S_c)^λ`, where the critical spot `S_c` solves
//!
//! ```text
//! f(S) = φ(e^{-r_f T}·N(φ·d1(S)) − 1) + λ·(φ(S − K) − Euro(S)) / S = 0
//! ```
//!
//! on a bracket `boundary_width` standard deviations wide on the
//! exercise side of the strike.

use crate::analytic_european_engine::{black_scholes_price, d1_d2};
use amopt_core::{errors::Result, Rate, Real, Time, Volatility};
use amopt_instruments::OptionType;
use amopt_math::{normal_cdf, Brent, Solver1D};

/// How the `λ` exponent scales with expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LambdaScaling {
    /// `2 / (σ²T)`.
    #[default]
    Time,
    /// The classical `α / h` with `α = 2r_d/σ²` and `h = 1 − e^{-r_d T}`.
    Discount,
}

/// Settings of the quadratic approximations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuadraticApproximation {
    /// A zero domestic rate is replaced by this value.
    pub zero_rate_floor: Rate,
    /// Half-width of the critical-spot bracket in standard deviations.
    pub boundary_width: Real,
    /// Scaling of the `λ` exponent.
    pub lambda_scaling: LambdaScaling,
    /// Absolute accuracy of the default Brent solver.
    pub accuracy: Real,
}

impl Default for QuadraticApproximation {
    fn default() -> Self {
        Self {
            zero_rate_floor: 1.0e-6,
            boundary_width: 6.0,
            lambda_scaling: LambdaScaling::Time,
            accuracy: 1.0e-11,
        }
    }
}

impl QuadraticApproximation {
    /// Replace the zero-rate floor.
    pub fn with_zero_rate_floor(mut self, floor: Rate) -> Self {
        self.zero_rate_floor = floor;
        self
    }

    /// Replace the bracket width.
    pub fn with_boundary_width(mut self, width: Real) -> Self {
        self.boundary_width = width;
        self
    }

    /// Replace the `λ` scaling.
    pub fn with_lambda_scaling(mut self, scaling: LambdaScaling) -> Self {
        self.lambda_scaling = scaling;
        self
    }

    /// Replace the solver accuracy.
    pub fn with_accuracy(mut self, accuracy: Real) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Brent solver at the configured accuracy.
    pub fn solver(&self) -> Brent {
        Brent::with_accuracy(self.accuracy)
    }
}

/// Market and contract inputs after rate stabilisation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuadraticInputs {
    pub option_type: OptionType,
    pub phi: Real,
    pub spot: Real,
    pub strike: Real,
    pub texp: Time,
    pub vol: Volatility,
    pub rd: Rate,
    pub rf: Rate,
}

impl QuadraticInputs {
    pub(crate) fn european(&self, spot: Real) -> Real {
        black_scholes_price(
            self.option_type,
            spot,
            self.strike,
            self.texp,
            self.vol,
            self.rd,
            self.rf,
        )
    }

    pub(crate) fn d1_d2(&self, spot: Real) -> (Real, Real) {
        d1_d2(spot, self.strike, self.texp, self.vol, self.rd, self.rf)
    }
}

/// Exponent parameters of the premium term.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QuadraticExponent {
    /// `2r_d/σ²`
    pub alpha: Real,
    /// `1 − e^{-r_d T}`
    pub h: Real,
    /// `2(r_d − r_f)/σ²`
    pub beta: Real,
    /// `√((β − 1)² + 4·ratio)`
    pub lam_arg: Real,
    /// `½(−(β − 1) + φ·lam_arg)`
    pub lambda: Real,
}

/// Early-exercise premium data at a reachable boundary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EarlyExercise {
    pub inputs: QuadraticInputs,
    pub exponent: QuadraticExponent,
    pub european: Real,
    pub critical_spot: Real,
    /// `φ(S_c − K) − Euro(S_c)`
    pub h_a: Real,
}

/// Outcome of the shared part of the approximations.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Approximation {
    /// Price settled without a premium term (degenerate inputs, unreachable
    /// boundary or immediate exercise).
    Resolved {
        price: Real,
        critical_spot: Option<Real>,
    },
    /// The spot lies in the continuation region.
    Premium(EarlyExercise),
}

/// Run the steps shared by Barone-Adesi-Whaley and Ju-Zhong.
#[allow(clippy::too_many_arguments)]
pub(crate) fn approximate<S: Solver1D>(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    texp: Time,
    vol: Volatility,
    rd: Rate,
    rf: Rate,
    config: &QuadraticApproximation,
    solver: &S,
) -> Result<Approximation> {
    let rd = if rd == 0.0 {
        tracing::warn!(
            floor = config.zero_rate_floor,
            "zero domestic rate replaced by floor"
        );
        config.zero_rate_floor
    } else {
        rd
    };

    if strike <= 0.0 {
        let price = match option_type {
            OptionType::Put => 0.0,
            OptionType::Call => {
                ((-rf * texp).exp() * spot - (-rd * texp).exp() * strike).max(spot - strike)
            }
        };
        return Ok(Approximation::Resolved {
            price,
            critical_spot: None,
        });
    }

    let inputs = QuadraticInputs {
        option_type,
        phi: option_type.sign(),
        spot,
        strike,
        texp,
        vol,
        rd,
        rf,
    };
    let european = inputs.european(spot);
    if vol <= 0.0 || texp <= 0.0 {
        return Ok(Approximation::Resolved {
            price: european,
            critical_spot: None,
        });
    }

    let phi = inputs.phi;
    let vol2 = vol * vol;
    let h = -(-rd * texp).exp_m1();
    let alpha = 2.0 * rd / vol2;
    let ratio = match config.lambda_scaling {
        LambdaScaling::Time => 2.0 / (vol2 * texp),
        LambdaScaling::Discount => alpha / h,
    };
    let beta = 2.0 * (rd - rf) / vol2;
    let lam_arg = ((beta - 1.0) * (beta - 1.0) + 4.0 * ratio).sqrt();
    let lambda = 0.5 * (-(beta - 1.0) + phi * lam_arg);
    let exponent = QuadraticExponent {
        alpha,
        h,
        beta,
        lam_arg,
        lambda,
    };

    let df_f = (-rf * texp).exp();
    let boundary = |s: Real| -> Real {
        let (d1, _) = inputs.d1_d2(s);
        phi * (df_f * normal_cdf(phi * d1) - 1.0)
            + lambda * (phi * (s - strike) - inputs.european(s)) / s
    };

    let far = (config.boundary_width * vol * texp.sqrt()).exp();
    let (lo, hi) = match option_type {
        OptionType::Call => {
            let hi = strike * far;
            if boundary(hi) < 0.0 {
                tracing::debug!(hi, "exercise boundary out of reach, using European price");
                return Ok(Approximation::Resolved {
                    price: european,
                    critical_spot: None,
                });
            }
            (strike, hi)
        }
        OptionType::Put => {
            let lo = strike / far;
            if boundary(lo) > 0.0 {
                tracing::debug!(lo, "exercise boundary out of reach, using European price");
                return Ok(Approximation::Resolved {
                    price: european,
                    critical_spot: None,
                });
            }
            (lo, strike)
        }
    };

    let critical_spot = solver.solve(boundary, lo, hi)?;

    if phi * (critical_spot - spot) <= 0.0 {
        tracing::debug!(critical_spot, spot, "spot beyond exercise boundary");
        return Ok(Approximation::Resolved {
            price: phi * (spot - strike),
            critical_spot: Some(critical_spot),
        });
    }

    let h_a = phi * (critical_spot - strike) - inputs.european(critical_spot);
    Ok(Approximation::Premium(EarlyExercise {
        inputs,
        exponent,
        european,
        critical_spot,
        h_a,
    }))
}
