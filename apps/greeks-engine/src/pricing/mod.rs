//! Options pricing and implied volatility.
//!
//! This module provides:
//! - Validated contract terms and the closed `OptionKind` enum
//! - Black-Scholes pricing built on one shared d1/d2 computation
//! - A Nelder-Mead minimizer and the implied volatility solver on top of it
//!
//! # Example
//!
//! ```
//! use greeks_engine::pricing::{ContractTerms, IvSolver, OptionKind, PricingModel};
//!
//! let terms = ContractTerms::new(100.0, 100.0, 1.0, 0.05, OptionKind::Call)?;
//! let model = PricingModel::new(terms);
//! let premium = model.price(0.2)?;
//!
//! let solution = IvSolver::default().solve(&model, premium)?;
//! assert!((solution.sigma - 0.2).abs() < 1e-4);
//! # Ok::<(), greeks_engine::PricingError>(())
//! ```

mod black_scholes;
mod iv;
mod normal;
mod simplex;
mod terms;

pub use black_scholes::{DTerms, PricingModel};
pub use iv::{DEFAULT_INITIAL_GUESS, IvSolution, IvSolver, IvSolverConfig};
pub use normal::{norm_cdf, norm_pdf};
pub use simplex::{NelderMead, SimplexConfig, SimplexReport};
pub use terms::{ContractTerms, OptionKind};
