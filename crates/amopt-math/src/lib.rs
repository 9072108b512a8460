//! # amopt-math
//!
//! Numerical building blocks for the pricers: the normal distribution (via
//! statrs), bracketed root-finders, polynomial regression bases, SVD least
//! squares (over nalgebra), seeded Gaussian deviates and running statistics.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Linear least-squares regression.
pub mod linear_least_squares;

/// Polynomial regression bases.
pub mod polynomials;

/// Random number generators.
pub mod random_numbers;

/// 1D root-finding solvers.
pub mod solvers1d;

/// Statistics accumulators.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::{normal_cdf, normal_pdf};
pub use linear_least_squares::LinearLeastSquaresRegression;
pub use polynomials::PolynomialBasis;
pub use random_numbers::GaussianRng;
pub use solvers1d::{Bisection, Brent, Solver1D};
pub use statistics::Statistics;
