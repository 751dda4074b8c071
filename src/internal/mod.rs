//! Internal modules ported from external libraries.
//!
//! These modules contain code adapted from:
//! - scipy: Gaussian kernel density estimation and linear interpolation

pub mod scipy;
