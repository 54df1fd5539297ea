//! Implied Volatility Solver
//!
//! Backs a volatility out of an observed premium by minimising the squared
//! pricing error `(price(sigma) - observed)^2` with a Nelder-Mead simplex
//! seeded at an initial guess.
//!
//! The search is local. It reliably lands on the implied volatility for
//! ordinary contracts but can settle on a meaningless point for deep
//! out-of-the-money options, maturities close to zero, or premiums outside
//! the no-arbitrage bounds. Those cases surface as
//! [`PricingError::ConvergenceFailure`] carrying the best sigma found.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::black_scholes::PricingModel;
use super::simplex::{NelderMead, SimplexConfig};
use crate::error::{PricingError, PricingResult, ensure_positive};

/// Default starting volatility (20% annualised).
pub const DEFAULT_INITIAL_GUESS: f64 = 0.2;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the implied volatility solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSolverConfig {
    /// Starting volatility for `solve`.
    pub initial_guess: f64,
    /// Maximum simplex iterations.
    pub max_iterations: usize,
    /// Maximum pricing evaluations.
    pub max_evaluations: usize,
    /// Simplex tolerance on volatility spread.
    pub x_tolerance: f64,
    /// Simplex tolerance on objective spread.
    pub f_tolerance: f64,
    /// Largest squared pricing error accepted as a solution.
    pub residual_tolerance: f64,
    /// Largest pricing error accepted as a solution, relative to the quote.
    pub price_tolerance: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        let simplex = SimplexConfig::default();
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            max_iterations: simplex.max_iterations,
            max_evaluations: simplex.max_evaluations,
            x_tolerance: simplex.x_tolerance,
            f_tolerance: simplex.f_tolerance,
            residual_tolerance: 1e-8,
            price_tolerance: 1e-6,
        }
    }
}

impl IvSolverConfig {
    /// Simplex settings derived from this configuration.
    #[must_use]
    pub const fn simplex(&self) -> SimplexConfig {
        SimplexConfig {
            max_iterations: self.max_iterations,
            max_evaluations: self.max_evaluations,
            x_tolerance: self.x_tolerance,
            f_tolerance: self.f_tolerance,
        }
    }
}

/// A solved implied volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IvSolution {
    /// Implied volatility.
    pub sigma: f64,
    /// Squared pricing error at `sigma`.
    pub residual: f64,
    /// Simplex iterations.
    pub iterations: usize,
    /// Pricing evaluations.
    pub function_evaluations: usize,
}

// ============================================================================
// Solver
// ============================================================================

/// Implied Volatility Solver.
#[derive(Debug, Clone, Default)]
pub struct IvSolver {
    config: IvSolverConfig,
}

impl IvSolver {
    /// Create a new IV solver with the given configuration.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &IvSolverConfig {
        &self.config
    }

    /// Solve from the configured initial guess.
    pub fn solve(&self, model: &PricingModel, observed_price: f64) -> PricingResult<IvSolution> {
        self.implied_volatility(model, self.config.initial_guess, observed_price)
    }

    /// Recover the volatility that reproduces `observed_price`.
    ///
    /// # Arguments
    ///
    /// * `model` - Pricing model for the contract
    /// * `initial_guess` - Starting volatility (> 0)
    /// * `observed_price` - Market premium (>= 0)
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a non-positive guess or a negative price;
    /// `ConvergenceFailure` when the simplex exhausts its budget, settles on
    /// a non-positive volatility, or leaves a residual above
    /// `residual_tolerance` or a pricing error above `price_tolerance` of
    /// the quote.
    pub fn implied_volatility(
        &self,
        model: &PricingModel,
        initial_guess: f64,
        observed_price: f64,
    ) -> PricingResult<IvSolution> {
        let initial_guess = ensure_positive("initial_guess", initial_guess)?;
        if !observed_price.is_finite() || observed_price < 0.0 {
            return Err(PricingError::InvalidParameter {
                name: "observed_price",
                value: observed_price,
                reason: "must be finite and non-negative",
            });
        }

        let objective = |x: &[f64]| match model.price(x[0]) {
            Ok(price) => (price - observed_price).powi(2),
            // Non-positive volatilities are outside the model.
            Err(_) => f64::INFINITY,
        };

        let report = NelderMead::with_config(self.config.simplex()).minimize(&[initial_guess], objective);
        let sigma = report.parameters[0];

        debug!(
            kind = %model.terms().kind(),
            strike = model.terms().strike(),
            observed_price,
            sigma,
            residual = report.objective,
            iterations = report.iterations,
            evaluations = report.function_evaluations,
            converged = report.converged,
            "implied volatility search finished"
        );

        // A tiny quote is within the absolute residual of a zero premium, so
        // the error must also be small against the quote itself.
        let price_error = report.objective.sqrt();
        let accepted = report.objective <= self.config.residual_tolerance
            && price_error <= self.config.price_tolerance * observed_price;

        if report.converged && sigma > 0.0 && accepted {
            return Ok(IvSolution {
                sigma,
                residual: report.objective,
                iterations: report.iterations,
                function_evaluations: report.function_evaluations,
            });
        }

        let (lower, upper) = model.intrinsic_bounds();
        warn!(
            observed_price,
            lower_bound = lower,
            upper_bound = upper,
            best_sigma = sigma,
            residual = report.objective,
            price_error,
            iterations = report.iterations,
            "implied volatility did not converge"
        );

        Err(PricingError::ConvergenceFailure {
            best_sigma: sigma,
            residual: report.objective,
            iterations: report.iterations,
            converged: report.converged,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::pricing::{ContractTerms, OptionKind};

    fn model(strike: f64, kind: OptionKind) -> PricingModel {
        PricingModel::new(ContractTerms::new(100.0, strike, 1.0, 0.05, kind).unwrap())
    }

    #[test]
    fn test_round_trip_reference_contract() {
        let model = model(100.0, OptionKind::Call);
        let price = model.price(0.2).unwrap();

        let solution = IvSolver::default()
            .implied_volatility(&model, 0.2, price)
            .unwrap();

        assert!((solution.sigma - 0.2).abs() < 1e-4);
        assert!(solution.residual <= 1e-8);
    }

    #[test_case(80.0, 0.30, OptionKind::Call ; "itm call")]
    #[test_case(80.0, 0.30, OptionKind::Put ; "otm put")]
    #[test_case(100.0, 0.50, OptionKind::Call ; "atm call high vol")]
    #[test_case(100.0, 0.50, OptionKind::Put ; "atm put high vol")]
    #[test_case(90.0, 0.15, OptionKind::Put ; "otm put low vol")]
    #[test_case(120.0, 0.25, OptionKind::Call ; "otm call")]
    #[test_case(130.0, 0.35, OptionKind::Put ; "itm put")]
    fn test_round_trip(strike: f64, true_sigma: f64, kind: OptionKind) {
        let model = model(strike, kind);
        let price = model.price(true_sigma).unwrap();

        let solution = match IvSolver::default().solve(&model, price) {
            Ok(s) => s,
            Err(e) => panic!("IV solver should converge: {e}"),
        };

        assert!((solution.sigma - true_sigma).abs() < 1e-4);
    }

    #[test]
    fn test_below_intrinsic_fails_with_best_sigma() {
        // Intrinsic value is ~22.47, nothing prices at 15.
        let model = PricingModel::new(
            ContractTerms::new(120.0, 100.0, 0.5, 0.05, OptionKind::Call).unwrap(),
        );

        let Err(PricingError::ConvergenceFailure {
            best_sigma,
            residual,
            converged,
            ..
        }) = IvSolver::default().solve(&model, 15.0)
        else {
            panic!("expected ConvergenceFailure below intrinsic value");
        };

        assert!(best_sigma > 0.0);
        assert!(residual > 1.0);
        // The simplex settles; the residual is what fails.
        assert!(converged);
    }

    #[test]
    fn test_iteration_budget_exhausted() {
        let solver = IvSolver::new(IvSolverConfig {
            max_iterations: 3,
            ..IvSolverConfig::default()
        });
        let model = model(100.0, OptionKind::Call);

        let Err(PricingError::ConvergenceFailure {
            iterations,
            converged,
            ..
        }) = solver.solve(&model, 10.0)
        else {
            panic!("three iterations cannot solve the contract");
        };

        assert_eq!(iterations, 3);
        assert!(!converged);
    }

    #[test]
    fn test_invalid_inputs() {
        let model = model(100.0, OptionKind::Call);
        let solver = IvSolver::default();

        assert!(matches!(
            solver.implied_volatility(&model, 0.0, 10.0),
            Err(PricingError::InvalidParameter {
                name: "initial_guess",
                ..
            })
        ));
        assert!(matches!(
            solver.implied_volatility(&model, 0.2, -1.0),
            Err(PricingError::InvalidParameter {
                name: "observed_price",
                ..
            })
        ));
    }

    #[test_case(1e-5 ; "ten millionths")]
    #[test_case(1e-4 ; "one ten thousandth")]
    fn test_tiny_deep_otm_quote_never_reports_wrong_sigma(quote: f64) {
        // Premium at any nearby sigma is ~1e-28, well inside the absolute
        // residual of the quote but nowhere near the quote itself.
        let model = PricingModel::new(
            ContractTerms::new(100.0, 200.0, 0.1, 0.05, OptionKind::Call).unwrap(),
        );

        match IvSolver::default().solve(&model, quote) {
            Ok(solution) => {
                let repriced = model.price(solution.sigma).unwrap();
                assert!(
                    (repriced - quote).abs() <= 1e-6 * quote,
                    "sigma {} reprices to {repriced:e}, quote {quote:e}",
                    solution.sigma
                );
            }
            Err(PricingError::ConvergenceFailure { residual, .. }) => {
                assert!(residual > 0.0);
            }
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    #[test]
    fn test_solved_quote_reprices_within_relative_tolerance() {
        let model = PricingModel::new(
            ContractTerms::new(100.0, 120.0, 0.5, 0.03, OptionKind::Call).unwrap(),
        );
        let solution = IvSolver::default().solve(&model, 1.2).unwrap();
        let repriced = model.price(solution.sigma).unwrap();

        assert!((repriced - 1.2).abs() <= 1e-6 * 1.2);
    }

    #[test]
    fn test_zero_price_has_no_solution() {
        let model = model(100.0, OptionKind::Call);
        let result = IvSolver::default().solve(&model, 0.0);
        assert!(matches!(result, Err(PricingError::ConvergenceFailure { .. })));
    }

    #[test]
    fn test_config_deserializes_partial() {
        let config: IvSolverConfig =
            serde_yaml_bw::from_str("initial_guess: 0.35\nmax_iterations: 50\n").unwrap();
        assert!((config.initial_guess - 0.35).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
        assert_eq!(config.max_evaluations, 1000);
        assert!((config.price_tolerance - 1e-6).abs() < f64::EPSILON);
    }
}
