//! # amopt
//!
//! American option pricing in Rust.
//!
//! This crate is a **façade** that re-exports the public items of the
//! workspace crates. Application code should depend on this crate rather
//! than the individual `amopt-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! amopt = "0.1"
//! ```
//!
//! ```rust
//! use amopt::prelude::*;
//!
//! let put = OptionContract::new(OptionType::Put, 100.0, 100.0, 1.0, 0.2, 0.05, 0.0).unwrap();
//! let american = put.price(&JuZhongEngine::new(QuadraticApproximation::default())).unwrap();
//! let european = put.price(&AnalyticEuropeanEngine::new()).unwrap();
//! assert!(american.npv > european.npv);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use amopt_core as core;

/// Mathematical utilities: distributions, root-finding, regression, RNG.
pub use amopt_math as math;

/// Option contracts, payoffs and strike schedules.
pub use amopt_instruments as instruments;

/// Numerical methods (lattices, Monte Carlo).
pub use amopt_methods as methods;

/// Pricing engines.
pub use amopt_pricingengines as pricingengines;

/// The items most pricing code needs.
pub mod prelude {
    pub use amopt_core::{Error, Rate, Real, Result, Time, Volatility};
    pub use amopt_instruments::{
        OptionContract, OptionType, PlainVanillaPayoff, PricingEngine, PricingResults,
        StrikeSchedule,
    };
    pub use amopt_math::PolynomialBasis;
    pub use amopt_methods::{BinomialScheme, LsmcConfig, LsmcResult, TreeSteps};
    pub use amopt_pricingengines::{
        barone_adesi_whaley_price, binomial_tree_price, black_scholes_price,
        ju_zhong_implied_volatility, ju_zhong_price, least_squares_monte_carlo,
        trinomial_tree_price, AnalyticEuropeanEngine, BaroneAdesiWhaleyEngine, BinomialEngine,
        JuZhongEngine, LambdaScaling, LsmcEngine, QuadraticApproximation, TrinomialEngine,
    };
}
