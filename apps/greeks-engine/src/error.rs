//! Error types for the pricing engine.
//!
//! Every failure is detected at the lowest pure-function boundary and
//! propagated upward with `?`. Leg construction is the atomic failure
//! boundary: a leg is either fully initialised or never exists.
//!
//! | Code | Raised by | Retryable |
//! |------|-----------|-----------|
//! | `INVALID_PARAMETER` | contract terms, pricing, risk, solver inputs | no |
//! | `INVALID_OPTION_KIND` | parsing an option label | no |
//! | `CONVERGENCE_FAILURE` | implied volatility search | with a new initial guess |

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A non-positive or non-finite value where a positive one is required.
    InvalidParameter,
    /// An option label outside {call, put}.
    InvalidOptionKind,
    /// The implied volatility search did not reach an acceptable residual.
    ConvergenceFailure,
}

impl ErrorCode {
    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidParameter => "INVALID_PARAMETER",
            Self::InvalidOptionKind => "INVALID_OPTION_KIND",
            Self::ConvergenceFailure => "CONVERGENCE_FAILURE",
        }
    }

    /// Whether a caller may reasonably retry (e.g. with another initial guess).
    ///
    /// Parameter and kind errors are deterministic.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::ConvergenceFailure)
    }
}

/// Errors raised by pricing, risk and implied volatility computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    /// Invalid numeric input.
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name (e.g. "spot", "sigma").
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// Option label that is neither a call nor a put.
    #[error("Invalid option kind '{label}': expected 'call' or 'put'")]
    InvalidOptionKind {
        /// The label as supplied.
        label: String,
    },

    /// Implied volatility search failed.
    #[error(
        "Implied volatility failed to converge after {iterations} iterations \
         (best sigma: {best_sigma:.6}, squared residual: {residual:.3e}, simplex converged: {converged})"
    )]
    ConvergenceFailure {
        /// Best volatility the minimizer found.
        best_sigma: f64,
        /// Squared pricing error at `best_sigma`.
        residual: f64,
        /// Iterations performed.
        iterations: usize,
        /// Whether the simplex itself met its tolerances.
        converged: bool,
    },
}

impl PricingError {
    /// Error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            Self::InvalidOptionKind { .. } => ErrorCode::InvalidOptionKind,
            Self::ConvergenceFailure { .. } => ErrorCode::ConvergenceFailure,
        }
    }

    /// Shorthand for a "must be strictly positive" parameter error.
    pub(crate) const fn not_positive(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason: "must be finite and strictly positive",
        }
    }
}

/// Result alias for engine operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Require `value` to be finite and strictly positive.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> PricingResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PricingError::not_positive(name, value))
    }
}
