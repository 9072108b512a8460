//! Error types for amopt.
//!
//! A single `thiserror`-derived enum covers every failure the pricers can
//! surface. Degenerate financial inputs (zero volatility, zero expiry,
//! non-positive strike) are *not* errors: the pricers resolve them to a
//! valid price. The `ensure!` macro defined here is the argument-check
//! shorthand used throughout the workspace.

use thiserror::Error;

/// The top-level error type used throughout amopt.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Invalid argument, e.g. an empty strike schedule or bad step bounds
    /// (raised by `ensure!`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A root-finder could not bracket a root or ran out of iterations.
    #[error("no convergence: {0}")]
    NonConvergence(String),

    /// A numerical quantity left its admissible range (e.g. a lattice
    /// probability outside `[0, 1]`).
    #[error("numeric instability: {0}")]
    NumericInstability(String),
}

/// Shorthand `Result` type used throughout amopt.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use amopt_core::ensure;
/// fn positive(x: f64) -> amopt_core::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_sqrt(x: f64) -> Result<f64> {
        ensure!(x >= 0.0, "negative input {x}");
        Ok(x.sqrt())
    }

    #[test]
    fn ensure_maps_to_invalid_argument() {
        assert_eq!(checked_sqrt(4.0), Ok(2.0));
        assert_eq!(
            checked_sqrt(-1.0),
            Err(Error::InvalidArgument("negative input -1".into()))
        );
    }

    #[test]
    fn display_messages() {
        let e = Error::NonConvergence("Brent: no sign change".into());
        assert_eq!(e.to_string(), "no convergence: Brent: no sign change");
        let e = Error::NumericInstability("p = 1.2".into());
        assert_eq!(e.to_string(), "numeric instability: p = 1.2");
        let e = Error::InvalidArgument("empty schedule".into());
        assert_eq!(e.to_string(), "invalid argument: empty schedule");
    }
}
