//! Polynomial regression bases.
//!
//! Orthogonal-polynomial families evaluated through their three-term
//! recurrences (the same recurrences that define the Gauss quadrature rules):
//!
//! | Basis | Recurrence |
//! |---|---|
//! | [`PolynomialBasis::Laguerre`] | `(n+1)L₍ₙ₊₁₎ = (2n+1-x)Lₙ - n·L₍ₙ₋₁₎` |
//! | [`PolynomialBasis::Hermite`] | `H₍ₙ₊₁₎ = 2x·Hₙ - 2n·H₍ₙ₋₁₎` (physicists') |
//! | [`PolynomialBasis::Monomial`] | `x^n` |
//!
//! A basis of degree `k` has `k + 1` functions. All three span the same space
//! of polynomials of degree `≤ k`; they differ only in conditioning.

use num_traits::Float;
use std::fmt;

/// Family of polynomials used as regression functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolynomialBasis {
    /// Laguerre polynomials `Lₙ(x)`.
    #[default]
    Laguerre,
    /// Physicists' Hermite polynomials `Hₙ(x)`.
    Hermite,
    /// Plain monomials `1, x, x², …`.
    Monomial,
}

impl PolynomialBasis {
    /// Number of basis functions for polynomials up to `degree`.
    pub fn size(self, degree: usize) -> usize {
        degree + 1
    }

    /// Write `P₀(x), …, P_degree(x)` into `out[..=degree]`.
    ///
    /// # Panics
    /// Panics if `out.len() < degree + 1`.
    pub fn fill<T: Float>(self, x: T, out: &mut [T]) {
        let n = out.len();
        if n == 0 {
            return;
        }
        let one = T::one();
        let two = one + one;
        out[0] = one;
        if n == 1 {
            return;
        }
        out[1] = match self {
            PolynomialBasis::Laguerre => one - x,
            PolynomialBasis::Hermite => two * x,
            PolynomialBasis::Monomial => x,
        };
        for k in 1..n - 1 {
            let kf = T::from(k).unwrap_or_else(T::zero);
            out[k + 1] = match self {
                PolynomialBasis::Laguerre => {
                    ((two * kf + one - x) * out[k] - kf * out[k - 1]) / (kf + one)
                }
                PolynomialBasis::Hermite => two * x * out[k] - two * kf * out[k - 1],
                PolynomialBasis::Monomial => x * out[k],
            };
        }
    }

    /// Evaluate all basis functions up to `degree` at `x`.
    pub fn values<T: Float>(self, degree: usize, x: T) -> Vec<T> {
        let mut out = vec![T::zero(); self.size(degree)];
        self.fill(x, &mut out);
        out
    }
}

impl fmt::Display for PolynomialBasis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolynomialBasis::Laguerre => write!(f, "laguerre"),
            PolynomialBasis::Hermite => write!(f, "hermite"),
            PolynomialBasis::Monomial => write!(f, "simple"),
        }
    }
}
