//! General linear least-squares regression.
//!
//! Solves `y = A·β + ε` through the SVD of the design matrix `A`, truncating
//! singular values below `rcond · s_max`. The truncation is the conditioning
//! safeguard for high-degree polynomial bases, whose design matrices are
//! nearly collinear.
//!
//! Used by the Longstaff-Schwartz method to estimate continuation values.

use crate::polynomials::PolynomialBasis;
use amopt_core::{
    ensure,
    errors::{Error, Result},
    Real,
};
use nalgebra::{DMatrix, DVector};

/// Result of a general linear least-squares regression.
#[derive(Debug, Clone)]
pub struct LinearLeastSquaresRegression {
    coefficients: DVector<Real>,
    fitted: DVector<Real>,
    residuals: DVector<Real>,
}

impl LinearLeastSquaresRegression {
    /// Regress `y` on the polynomial `basis` of degree `degree` in `x`.
    ///
    /// `rcond` is the relative singular-value cutoff; `None` uses
    /// `max(n, m) · ε_machine`.
    pub fn polynomial(
        x: &[Real],
        y: &[Real],
        basis: PolynomialBasis,
        degree: usize,
        rcond: Option<Real>,
    ) -> Result<Self> {
        let n = x.len();
        let m = basis.size(degree);
        ensure!(n == y.len(), "x and y must have the same length");
        ensure!(n >= m, "{m} basis functions but only {n} observations");

        let mut a = DMatrix::<Real>::zeros(n, m);
        let mut row = vec![0.0; m];
        for (i, &xi) in x.iter().enumerate() {
            basis.fill(xi, &mut row);
            for (j, &v) in row.iter().enumerate() {
                a[(i, j)] = v;
            }
        }

        Self::from_design_matrix(a, y, rcond)
    }

    /// Fit the model given a pre-built `n × m` design matrix.
    pub fn from_design_matrix(a: DMatrix<Real>, y: &[Real], rcond: Option<Real>) -> Result<Self> {
        let (n, m) = a.shape();
        ensure!(y.len() == n, "y length must equal number of rows of A");

        let y_vec = DVector::from_column_slice(y);
        let svd = a.clone().svd(true, true);
        let sv_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
        let rcond = rcond.unwrap_or(n.max(m) as Real * f64::EPSILON);
        let threshold = rcond * sv_max;

        let coefficients = svd
            .solve(&y_vec, threshold)
            .map_err(|e| Error::NumericInstability(format!("least squares: {e}")))?;
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(Error::NumericInstability(
                "least squares: non-finite coefficients".into(),
            ));
        }

        let fitted = &a * &coefficients;
        let residuals = &y_vec - &fitted;

        Ok(Self {
            coefficients,
            fitted,
            residuals,
        })
    }

    /// Fitted coefficients β.
    pub fn coefficients(&self) -> &[Real] {
        self.coefficients.as_slice()
    }

    /// Fitted values `A·β`, one per observation.
    pub fn fitted_values(&self) -> &[Real] {
        self.fitted.as_slice()
    }

    /// Residuals `y − A·β`.
    pub fn residuals(&self) -> &[Real] {
        self.residuals.as_slice()
    }
}
