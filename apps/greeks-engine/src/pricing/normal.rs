//! Standard normal distribution helpers.

use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF (cumulative distribution function).
///
/// Written with `erfc` so the lower tail keeps its precision instead of
/// cancelling in `1 + erf(x)`.
#[must_use]
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x / SQRT_2)
}

/// Standard normal PDF (probability density function).
#[must_use]
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}
