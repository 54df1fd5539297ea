//! Strategy leg types and construction.

use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::error::{PricingError, PricingResult};
use crate::pricing::{ContractTerms, IvSolution, IvSolver, OptionKind, PricingModel};
use crate::risk::{Greeks, RiskCalculator};

/// Position direction for a leg.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegDirection {
    /// Long position (bought).
    #[default]
    Long,
    /// Short position (sold/written).
    Short,
}

/// Direction and size of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    direction: LegDirection,
    quantity: u32,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            direction: LegDirection::Long,
            quantity: 1,
        }
    }
}

impl Position {
    /// Build a position. Quantity must be at least one contract.
    pub fn new(direction: LegDirection, quantity: u32) -> PricingResult<Self> {
        if quantity == 0 {
            return Err(PricingError::InvalidParameter {
                name: "quantity",
                value: 0.0,
                reason: "must be at least one contract",
            });
        }
        Ok(Self {
            direction,
            quantity,
        })
    }

    /// Long or short.
    #[must_use]
    pub const fn direction(&self) -> LegDirection {
        self.direction
    }

    /// Number of contracts.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Quantity signed by direction (positive long, negative short).
    #[must_use]
    pub fn signed_quantity(&self) -> f64 {
        match self.direction {
            LegDirection::Long => f64::from(self.quantity),
            LegDirection::Short => -f64::from(self.quantity),
        }
    }
}

/// A single option position with its implied volatility and Greeks.
///
/// Everything is resolved at construction and frozen afterwards. Building a
/// leg runs an iterative implied volatility search, so it is not a cheap
/// value constructor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leg {
    terms: ContractTerms,
    quoted_price: f64,
    position: Position,
    solution: IvSolution,
    greeks: Greeks,
}

impl Leg {
    /// Build a long single-contract leg from a quoted premium.
    ///
    /// Implied volatility is solved from a 20% starting guess.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for non-positive spot, strike or maturity;
    /// `ConvergenceFailure` when no volatility reproduces `quoted_price`.
    pub fn new(
        underlying: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        quoted_price: f64,
        kind: OptionKind,
    ) -> PricingResult<Self> {
        let terms = ContractTerms::new(underlying, strike, maturity, rate, kind)?;
        Self::with_solver(terms, quoted_price, Position::default(), &IvSolver::default())
    }

    /// Long single-contract call; see [`Leg::new`].
    pub fn call(
        underlying: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        quoted_price: f64,
    ) -> PricingResult<Self> {
        Self::new(underlying, strike, maturity, rate, quoted_price, OptionKind::Call)
    }

    /// Build a leg with an explicit position and solver configuration.
    pub fn with_solver(
        terms: ContractTerms,
        quoted_price: f64,
        position: Position,
        solver: &IvSolver,
    ) -> PricingResult<Self> {
        let span = debug_span!(
            "leg.build",
            kind = %terms.kind(),
            strike = terms.strike(),
            quoted_price
        );
        let _enter = span.enter();

        let solution = solver.solve(&PricingModel::new(terms), quoted_price)?;
        let greeks = RiskCalculator::new(terms, solution.sigma)?.greeks();

        Ok(Self {
            terms,
            quoted_price,
            position,
            solution,
            greeks,
        })
    }

    /// Contract terms.
    #[must_use]
    pub const fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    /// Premium the volatility was implied from.
    #[must_use]
    pub const fn quoted_price(&self) -> f64 {
        self.quoted_price
    }

    /// Direction and size.
    #[must_use]
    pub const fn position(&self) -> &Position {
        &self.position
    }

    /// Implied volatility.
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.solution.sigma
    }

    /// Full solver output (residual, iterations).
    #[must_use]
    pub const fn solution(&self) -> &IvSolution {
        &self.solution
    }

    /// Per-contract Greeks.
    #[must_use]
    pub const fn greeks(&self) -> &Greeks {
        &self.greeks
    }

    /// Per-contract delta.
    #[must_use]
    pub const fn delta(&self) -> f64 {
        self.greeks.delta
    }

    /// Per-contract gamma.
    #[must_use]
    pub const fn gamma(&self) -> f64 {
        self.greeks.gamma
    }

    /// Per-contract vega (per volatility point).
    #[must_use]
    pub const fn vega(&self) -> f64 {
        self.greeks.vega
    }

    /// Per-contract theta (per day).
    #[must_use]
    pub const fn theta(&self) -> f64 {
        self.greeks.theta
    }

    /// Per-contract rho (per 1% rate).
    #[must_use]
    pub const fn rho(&self) -> f64 {
        self.greeks.rho
    }

    /// Greeks scaled by the signed position size.
    #[must_use]
    pub fn position_greeks(&self) -> Greeks {
        self.greeks.scale(self.position.signed_quantity())
    }

    /// Net premium (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        -self.quoted_price * self.position.signed_quantity()
    }
}

fn default_option_label() -> String {
    OptionKind::Call.as_str().to_string()
}

const fn default_quantity() -> u32 {
    1
}

/// Serializable description of a leg, as read from configuration.
///
/// The option kind is a free-form label so that an unknown kind is reported
/// as `InvalidOptionKind` when the leg is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSpec {
    /// Underlying spot price.
    pub underlying: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to maturity in years.
    pub maturity: f64,
    /// Risk-free rate.
    pub rate: f64,
    /// Quoted premium.
    pub price: f64,
    /// "call" or "put".
    #[serde(default = "default_option_label")]
    pub option: String,
    /// Long or short.
    #[serde(default)]
    pub direction: LegDirection,
    /// Number of contracts.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl LegSpec {
    /// Long single-contract spec.
    #[must_use]
    pub fn new(
        underlying: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        price: f64,
        option: impl Into<String>,
    ) -> Self {
        Self {
            underlying,
            strike,
            maturity,
            rate,
            price,
            option: option.into(),
            direction: LegDirection::Long,
            quantity: 1,
        }
    }

    /// Parse, validate and build the leg.
    pub fn build(&self, solver: &IvSolver) -> PricingResult<Leg> {
        let kind: OptionKind = self.option.parse()?;
        let terms = ContractTerms::new(self.underlying, self.strike, self.maturity, self.rate, kind)?;
        let position = Position::new(self.direction, self.quantity)?;
        Leg::with_solver(terms, self.price, position, solver)
    }
}
