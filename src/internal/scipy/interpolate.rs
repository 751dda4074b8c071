//! One-dimensional interpolation ported from scipy.interpolate.interp1d
//!
//! Only the linear kind with `fill_value="extrapolate"` is provided.
//!
//! License: BSD 3-Clause (SciPy Developers)

/// Evaluate the piecewise linear interpolant of `(xs, ys)` at `at`.
///
/// Points outside `[xs[0], xs[n-1]]` are extrapolated from the nearest
/// boundary segment. `xs` must be strictly increasing.
///
/// # Returns
/// `None` when the inputs are empty or of different lengths.
pub fn interp1d(xs: &[f64], ys: &[f64], at: f64) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    if xs.len() == 1 {
        return Some(ys[0]);
    }

    // Index of the segment [xs[lo], xs[lo + 1]] used for the estimate
    let last_segment = xs.len() - 2;
    let lo = match xs.iter().position(|&x| x > at) {
        Some(0) => 0,
        Some(i) => (i - 1).min(last_segment),
        None => last_segment,
    };

    let (x0, x1) = (xs[lo], xs[lo + 1]);
    let (y0, y1) = (ys[lo], ys[lo + 1]);
    let slope = (y1 - y0) / (x1 - x0);

    Some(y0 + slope * (at - x0))
}
