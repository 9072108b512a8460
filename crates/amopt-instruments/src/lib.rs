//! # amopt-instruments
//!
//! Option contracts, payoffs and strike schedules, plus the
//! [`PricingEngine`] trait that every pricer implements.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod instrument;
pub mod option;
pub mod payoff;
pub mod strike_schedule;

pub use instrument::{PricingEngine, PricingResults};
pub use option::OptionContract;
pub use payoff::{OptionType, PlainVanillaPayoff};
pub use strike_schedule::StrikeSchedule;
