//! # amopt-pricingengines
//!
//! American option pricers, each available as a free function and as a
//! [`PricingEngine`](amopt_instruments::PricingEngine) over
//! [`OptionContract`](amopt_instruments::OptionContract).
//!
//! ## Engines
//!
//! - [`AnalyticEuropeanEngine`]: Black-Scholes closed form, the fallback of
//!   every other pricer
//! - [`BinomialEngine`]: moment-matching or Cox-Ross-Rubinstein lattice
//! - [`TrinomialEngine`]: equal-probability trinomial lattice
//! - [`BaroneAdesiWhaleyEngine`]: quadratic approximation
//! - [`JuZhongEngine`]: quadratic approximation with second-order correction
//! - [`LsmcEngine`]: Longstaff-Schwartz least-squares Monte Carlo

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_european_engine;
pub mod barone_adesi_whaley_engine;
pub mod binomial_engine;
pub mod ju_zhong_engine;
pub mod lsmc_engine;
pub mod quadratic_approximation;
pub mod trinomial_engine;

pub use analytic_european_engine::{black_scholes_price, AnalyticEuropeanEngine};
pub use barone_adesi_whaley_engine::{
    barone_adesi_whaley_price, barone_adesi_whaley_price_with, BaroneAdesiWhaleyEngine,
};
pub use binomial_engine::{binomial_tree_price, BinomialEngine};
pub use ju_zhong_engine::{
    ju_zhong_implied_volatility, ju_zhong_price, ju_zhong_price_with, JuZhongEngine,
};
pub use lsmc_engine::{least_squares_monte_carlo, LsmcEngine};
pub use quadratic_approximation::{LambdaScaling, QuadraticApproximation};
pub use trinomial_engine::{trinomial_tree_price, TrinomialEngine};
