// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Greeks Engine - Black-Scholes pricing and risk library
//!
//! Prices European options, backs implied volatility out of quoted premiums
//! and aggregates Greeks across multi-leg strategies.
//!
//! # Modules
//!
//! - **pricing**: contract terms, Black-Scholes model, Nelder-Mead minimizer,
//!   implied volatility solver
//! - **risk**: closed-form delta, gamma, vega, theta and rho
//! - **strategy**: legs (terms + quote + position) and their aggregation
//! - **config**: YAML configuration with environment variable interpolation
//! - **error**: the shared `PricingError` type
//!
//! # Example
//!
//! ```
//! use greeks_engine::{Leg, OptionKind, Strategy};
//!
//! let call = Leg::call(100.0, 100.0, 1.0, 0.05, 10.0)?;
//! let put = Leg::new(100.0, 110.0, 1.0, 0.05, 5.0, OptionKind::Put)?;
//! let strategy = Strategy::new(vec![call, put]);
//!
//! assert!(strategy.delta() < 0.0);
//! assert!(strategy.gamma() > 0.0);
//! # Ok::<(), greeks_engine::PricingError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Error types shared by every pricing operation.
pub mod error;

/// Contract terms, Black-Scholes pricing and implied volatility.
pub mod pricing;

/// Greeks calculation.
pub mod risk;

/// Legs and multi-leg strategies.
pub mod strategy;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ErrorCode, PricingError, PricingResult};
pub use pricing::{
    ContractTerms, IvSolution, IvSolver, IvSolverConfig, NelderMead, OptionKind, PricingModel,
};
pub use risk::{Greeks, RiskCalculator};
pub use strategy::{Leg, LegDirection, LegSpec, Position, Strategy};
