//! Option risk sensitivities.
//!
//! This module provides:
//! - `RiskCalculator`: closed-form Black-Scholes Greeks at a given volatility
//! - `Greeks`: the value type aggregated across legs and strategies

mod calculator;
mod greeks;

pub use calculator::RiskCalculator;
pub use greeks::Greeks;
