//! Contract terms and option kind.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PricingError, PricingResult, ensure_positive};

/// Option type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// Call option.
    #[default]
    Call,
    /// Put option.
    Put,
}

impl OptionKind {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Put => "put",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = PricingError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            _ => Err(PricingError::InvalidOptionKind {
                label: label.to_string(),
            }),
        }
    }
}

/// Market and contract inputs for a European option.
///
/// Spot, strike and maturity are strictly positive once constructed, so
/// `ln(S/K)` and `sqrt(T)` are always defined downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContractTerms {
    spot: f64,
    strike: f64,
    maturity: f64,
    rate: f64,
    kind: OptionKind,
}

impl ContractTerms {
    /// Validate and build contract terms.
    ///
    /// # Arguments
    ///
    /// * `spot` - Underlying price (S > 0)
    /// * `strike` - Strike price (K > 0)
    /// * `maturity` - Time to expiration in years (T > 0)
    /// * `rate` - Continuously compounded risk-free rate (any finite value)
    /// * `kind` - Call or put
    pub fn new(
        spot: f64,
        strike: f64,
        maturity: f64,
        rate: f64,
        kind: OptionKind,
    ) -> PricingResult<Self> {
        if !rate.is_finite() {
            return Err(PricingError::InvalidParameter {
                name: "rate",
                value: rate,
                reason: "must be finite",
            });
        }

        Ok(Self {
            spot: ensure_positive("spot", spot)?,
            strike: ensure_positive("strike", strike)?,
            maturity: ensure_positive("maturity", maturity)?,
            rate,
            kind,
        })
    }

    /// Underlying spot price.
    #[must_use]
    pub const fn spot(&self) -> f64 {
        self.spot
    }

    /// Strike price.
    #[must_use]
    pub const fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to maturity in years.
    #[must_use]
    pub const fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Risk-free rate.
    #[must_use]
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// Call or put.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Discount factor `e^(-rT)`.
    #[must_use]
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Same contract with the opposite option kind.
    #[must_use]
    pub const fn with_kind(self, kind: OptionKind) -> Self {
        Self { kind, ..self }
    }
}
