//! # amopt-methods
//!
//! Numerical methods for American exercise: recombining lattices with
//! backward induction and least-squares Monte Carlo.
//!
//! # Modules
//!
//! * [`lattice`]: binomial/trinomial trees, step policy, strike cursor
//! * [`monte_carlo`]: GBM path simulation and Longstaff-Schwartz regression

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Lattice methods: binomial trees, trinomial trees, backward induction.
pub mod lattice;

/// Monte Carlo simulation and least-squares exercise estimation.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use lattice::{
    BinomialScheme, BinomialTree, StrikeCursor, TimeGrid, TreeSteps, TrinomialTree,
    BREAKPOINT_TOLERANCE,
};
pub use monte_carlo::{
    longstaff_schwartz, ExerciseIndicator, LsmcConfig, LsmcResult, SimulationPathSet,
};
