//! 1D bracketed root-finding.
//!
//! Every solver implements [`Solver1D`]: given a bracket `[lo, hi]` on which
//! `f` changes sign it returns a root, and it fails with
//! [`Error::NonConvergence`] when there is no sign change or the iteration
//! budget runs out. It never returns a default value in place of a root.

use amopt_core::{
    errors::{Error, Result},
    Real,
};

const MAX_ITERATIONS: u32 = 100;
const DEFAULT_ACCURACY: Real = 1.0e-11;

/// A bracketed 1-D root-finder.
pub trait Solver1D {
    /// Find a root of a fallible objective on `[lo, hi]`.
    ///
    /// An error returned by `f` aborts the search and is propagated as is.
    fn try_solve<F>(&self, f: F, lo: Real, hi: Real) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>;

    /// Find a root of `f` on `[lo, hi]`.
    fn solve<F>(&self, mut f: F, lo: Real, hi: Real) -> Result<Real>
    where
        F: FnMut(Real) -> Real,
    {
        self.try_solve(|x| Ok(f(x)), lo, hi)
    }
}

fn bracket_values<F>(name: &str, f: &mut F, a: Real, b: Real) -> Result<(Real, Real)>
where
    F: FnMut(Real) -> Result<Real>,
{
    let fa = f(a)?;
    let fb = f(b)?;
    if !fa.is_finite() || !fb.is_finite() {
        return Err(Error::NonConvergence(format!(
            "{name}: non-finite objective at the bracket, f({a}) = {fa}, f({b}) = {fb}"
        )));
    }
    if fa * fb > 0.0 {
        return Err(Error::NonConvergence(format!(
            "{name}: f({a}) = {fa} and f({b}) = {fb} must have opposite signs"
        )));
    }
    Ok((fa, fb))
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method: bisection, secant and inverse quadratic interpolation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brent {
    /// Absolute accuracy on the root.
    pub accuracy: Real,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for Brent {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

impl Brent {
    /// Brent solver with the given absolute accuracy.
    pub fn with_accuracy(accuracy: Real) -> Self {
        Self {
            accuracy: if accuracy > 0.0 {
                accuracy
            } else {
                DEFAULT_ACCURACY
            },
            ..Self::default()
        }
    }
}

impl Solver1D for Brent {
    fn try_solve<F>(&self, mut f: F, lo: Real, hi: Real) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        let acc = self.accuracy;
        let mut a = lo;
        let mut b = hi;
        let (mut fa, mut fb) = bracket_values("Brent", &mut f, a, b)?;
        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }

        let mut c = b;
        let mut fc = fb;
        let mut d = b - a;
        let mut e = d;

        for _ in 0..self.max_iterations {
            if fb * fc > 0.0 {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }
            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
            let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
            let xm = 0.5 * (c - b);
            if xm.abs() <= tol || fb == 0.0 {
                return Ok(b);
            }
            if e.abs() >= tol && fa.abs() > fb.abs() {
                let s = fb / fa;
                let (p, q) = if a == c {
                    (2.0 * xm * s, 1.0 - s)
                } else {
                    let q = fa / fc;
                    let r = fb / fc;
                    let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                    let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                    (p, q)
                };
                let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
                if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                    e = d;
                    d = p / q;
                } else {
                    d = xm;
                    e = d;
                }
            } else {
                d = xm;
                e = d;
            }
            a = b;
            fa = fb;
            b += if d.abs() > tol {
                d
            } else if xm > 0.0 {
                tol
            } else {
                -tol
            };
            fb = f(b)?;
            if !fb.is_finite() {
                return Err(Error::NonConvergence(format!(
                    "Brent: non-finite objective f({b}) = {fb}"
                )));
            }
        }
        Err(Error::NonConvergence(format!(
            "Brent: maximum iterations ({}) reached",
            self.max_iterations
        )))
    }
}

// ── Bisection ────────────────────────────────────────────────────────────────

/// Plain bisection. Slow but unconditionally robust on a valid bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bisection {
    /// Absolute accuracy on the root.
    pub accuracy: Real,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for Bisection {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_iterations: 200,
        }
    }
}

impl Solver1D for Bisection {
    fn try_solve<F>(&self, mut f: F, lo: Real, hi: Real) -> Result<Real>
    where
        F: FnMut(Real) -> Result<Real>,
    {
        let mut a = lo;
        let mut b = hi;
        let (mut fa, fb) = bracket_values("Bisection", &mut f, a, b)?;
        if fa == 0.0 {
            return Ok(a);
        }
        if fb == 0.0 {
            return Ok(b);
        }

        for _ in 0..self.max_iterations {
            let mid = 0.5 * (a + b);
            let fm = f(mid)?;
            if fm == 0.0 || (b - a).abs() * 0.5 < self.accuracy {
                return Ok(mid);
            }
            if fm * fa > 0.0 {
                a = mid;
                fa = fm;
            } else {
                b = mid;
            }
        }
        Err(Error::NonConvergence(format!(
            "Bisection: maximum iterations ({}) reached",
            self.max_iterations
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brent_sqrt2() {
        let root = Brent::with_accuracy(1e-12)
            .solve(|x| x * x - 2.0, 0.0, 2.0)
            .unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn bisection_sqrt2() {
        let root = Bisection::default().solve(|x| x * x - 2.0, 0.0, 2.0).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn brent_decreasing_function() {
        let root = Brent::default().solve(|x| (-x).exp() - 0.5, 0.0, 5.0).unwrap();
        assert!((root - 2.0_f64.ln()).abs() < 1e-10, "got {root}");
    }

    #[test]
    fn brent_opposite_signs_required() {
        let err = Brent::default().solve(|x| x, 1.0, 2.0).unwrap_err();
        assert!(matches!(err, Error::NonConvergence(_)), "{err}");
    }

    #[test]
    fn bisection_opposite_signs_required() {
        assert!(Bisection::default().solve(|x| x * x + 1.0, -1.0, 1.0).is_err());
    }

    #[test]
    fn brent_root_at_bracket_end() {
        assert_eq!(Brent::default().solve(|x| x - 1.0, 1.0, 3.0).unwrap(), 1.0);
    }

    #[test]
    fn objective_error_is_propagated() {
        let err = Brent::default()
            .try_solve(
                |x| {
                    if x > 1.5 {
                        Err(Error::InvalidArgument("objective failed".into()))
                    } else {
                        Ok(x - 1.0)
                    }
                },
                0.0,
                2.0,
            )
            .unwrap_err();
        assert_eq!(err, Error::InvalidArgument("objective failed".into()));
    }

    #[test]
    fn non_finite_objective_is_rejected() {
        let err = Brent::default().solve(|_| f64::NAN, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, Error::NonConvergence(_)));
    }

    #[test]
    fn max_iterations_reported() {
        let solver = Brent {
            accuracy: 1e-300,
            max_iterations: 2,
        };
        assert!(solver.solve(|x| x.powi(3) - 0.3, 0.0, 1.0).is_err());
    }
}
