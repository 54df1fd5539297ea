//! Greeks value type.
//!
//! Provides the Greeks struct for option sensitivities along with the
//! arithmetic needed to aggregate them across legs.

use std::iter::Sum;

use serde::{Deserialize, Serialize};

/// Greeks for an option or a strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option price with respect to underlying price.
    /// Range: -1.0 to 1.0 for individual options.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to underlying price.
    pub gamma: f64,
    /// Vega - sensitivity to volatility (per 1 percentage point).
    pub vega: f64,
    /// Theta - rate of change of option price with respect to time (per day).
    /// Typically negative for long options.
    pub theta: f64,
    /// Rho - sensitivity to interest rate changes (per 1% change in rates).
    pub rho: f64,
}

impl Greeks {
    /// Scale Greeks by a quantity (positive for long, negative for short).
    #[must_use]
    pub fn scale(&self, quantity: f64) -> Self {
        Self {
            delta: self.delta * quantity,
            gamma: self.gamma * quantity,
            vega: self.vega * quantity,
            theta: self.theta * quantity,
            rho: self.rho * quantity,
        }
    }

    /// Add another Greeks to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            vega: self.vega + other.vega,
            theta: self.theta + other.theta,
            rho: self.rho + other.rho,
        }
    }
}

impl Sum for Greeks {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, g| acc.add(&g))
    }
}
