//! Gaussian kernel density estimation ported from scipy.stats.gaussian_kde
//!
//! License: BSD 3-Clause (SciPy Developers)

use nalgebra::{Cholesky, DMatrix, DVector};
use thiserror::Error;

/// Smallest ratio between the narrowest and widest kernel axis.
///
/// Measured on the Cholesky factor, so it depends on the spread of the data
/// and not on where the data sits.
const SINGULAR_TOLERANCE: f64 = 1e-7;

/// Reasons a density estimate cannot be built from a dataset.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdeError {
    #[error("dataset needs more than one point")]
    TooFewPoints,

    #[error("sample covariance is singular")]
    SingularCovariance,
}

/// Gaussian kernel density estimate with Scott's bandwidth rule.
///
/// This is a port of scipy's `gaussian_kde` restricted to unweighted data.
#[derive(Debug, Clone)]
pub struct GaussianKde {
    /// Dataset (n_dims x n_points), one point per column as in scipy.
    dataset: DMatrix<f64>,
    /// Bandwidth factor.
    factor: f64,
    /// Kernel covariance (data covariance scaled by factor^2).
    covariance: DMatrix<f64>,
    /// Lower Cholesky factor of `covariance`.
    lower: DMatrix<f64>,
    /// log of the normalisation constant of a single kernel.
    log_norm: f64,
}

impl GaussianKde {
    /// Fit a density estimate.
    ///
    /// # Arguments
    /// * `dataset` - Points as columns (n_dims x n_points)
    pub fn new(dataset: &DMatrix<f64>) -> Result<Self, KdeError> {
        let n_dims = dataset.nrows();
        let n_points = dataset.ncols();

        if n_dims == 0 || n_points < 2 {
            return Err(KdeError::TooFewPoints);
        }

        let factor = scotts_factor(n_points, n_dims);
        let data_covariance = sample_covariance(dataset);
        let covariance = data_covariance * (factor * factor);

        if covariance.iter().any(|v| !v.is_finite()) {
            return Err(KdeError::SingularCovariance);
        }

        let cholesky = Cholesky::new(covariance.clone()).ok_or(KdeError::SingularCovariance)?;
        let lower = cholesky.unpack();

        let max_diagonal = lower.diagonal().iter().fold(0.0_f64, |acc, &v| acc.max(v));
        let min_diagonal = lower.diagonal().iter().fold(f64::INFINITY, |acc, &v| acc.min(v));
        if !(max_diagonal > 0.0) || !(min_diagonal > SINGULAR_TOLERANCE * max_diagonal) {
            return Err(KdeError::SingularCovariance);
        }

        let log_det: f64 = 2.0 * lower.diagonal().iter().map(|v| v.ln()).sum::<f64>();
        let log_norm = 0.5 * (n_dims as f64 * (2.0 * std::f64::consts::PI).ln() + log_det);

        Ok(Self {
            dataset: dataset.clone(),
            factor,
            covariance,
            lower,
            log_norm,
        })
    }

    /// Number of dimensions.
    pub fn n_dims(&self) -> usize {
        self.dataset.nrows()
    }

    /// Number of data points.
    pub fn n_points(&self) -> usize {
        self.dataset.ncols()
    }

    /// Bandwidth factor.
    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Kernel covariance matrix.
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Log of the estimated density at `point`.
    ///
    /// Returns NaN when `point` has the wrong dimension.
    pub fn logpdf(&self, point: &DVector<f64>) -> f64 {
        if point.len() != self.n_dims() {
            return f64::NAN;
        }

        let mut exponents = Vec::with_capacity(self.n_points());
        for column in self.dataset.column_iter() {
            let diff = point - column;
            let whitened = match self.lower.solve_lower_triangular(&diff) {
                Some(w) => w,
                None => return f64::NAN,
            };
            exponents.push(-0.5 * whitened.norm_squared());
        }

        log_sum_exp(&exponents) - (self.n_points() as f64).ln() - self.log_norm
    }
}

/// Scott's rule: n^(-1 / (d + 4)).
pub fn scotts_factor(n_points: usize, n_dims: usize) -> f64 {
    (n_points as f64).powf(-1.0 / (n_dims as f64 + 4.0))
}

/// Unbiased covariance of the columns of `dataset` (n_dims x n_dims).
pub fn sample_covariance(dataset: &DMatrix<f64>) -> DMatrix<f64> {
    let n_points = dataset.ncols();
    let mean = dataset.column_mean();

    let mut centered = dataset.clone();
    for mut column in centered.column_iter_mut() {
        column -= &mean;
    }

    &centered * centered.transpose() / (n_points as f64 - 1.0)
}

/// Numerically stable log(sum(exp(values))).
pub fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        return max;
    }
    let sum: f64 = values.iter().map(|v| (v - max).exp()).sum();
    max + sum.ln()
}
