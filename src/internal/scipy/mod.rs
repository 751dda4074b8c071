//! SciPy functions port.
//!
//! Ported from:
//! - scipy.stats.gaussian_kde
//! - scipy.interpolate.interp1d
//!
//! License: BSD 3-Clause (SciPy Developers)

mod interpolate;
mod stats;

pub use interpolate::*;
pub use stats::*;
