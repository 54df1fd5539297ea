//! Black-Scholes Greeks for a single contract.

use crate::error::PricingResult;
use crate::pricing::{ContractTerms, DTerms, OptionKind, norm_cdf, norm_pdf};

use super::greeks::Greeks;

/// Days per year used to express theta per calendar day.
const DAYS_PER_YEAR: f64 = 365.0;
/// Converts per-unit sensitivities to per-percentage-point.
const PER_PERCENT: f64 = 100.0;

/// Closed-form Greeks at a fixed volatility.
///
/// d1/d2 are computed once at construction through [`DTerms`], the same
/// computation the pricing model uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskCalculator {
    terms: ContractTerms,
    sigma: f64,
    d: DTerms,
}

impl RiskCalculator {
    /// Build a calculator. Fails when `sigma` is not strictly positive.
    pub fn new(terms: ContractTerms, sigma: f64) -> PricingResult<Self> {
        let d = DTerms::compute(&terms, sigma)?;
        Ok(Self { terms, sigma, d })
    }

    /// Volatility the Greeks are evaluated at.
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Shared d1/d2 terms.
    #[must_use]
    pub const fn d_terms(&self) -> &DTerms {
        &self.d
    }

    /// Delta: N(d1) for calls, N(d1) - 1 for puts.
    #[must_use]
    pub fn delta(&self) -> f64 {
        match self.terms.kind() {
            OptionKind::Call => norm_cdf(self.d.d1),
            OptionKind::Put => norm_cdf(self.d.d1) - 1.0,
        }
    }

    /// Gamma: n(d1) / (S sigma sqrt(T)). Same for calls and puts.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        norm_pdf(self.d.d1) / (self.terms.spot() * self.d.sigma_sqrt_t)
    }

    /// Vega per 1 volatility point: S n(d1) sqrt(T) / 100.
    #[must_use]
    pub fn vega(&self) -> f64 {
        self.terms.spot() * norm_pdf(self.d.d1) * self.terms.maturity().sqrt() / PER_PERCENT
    }

    /// Theta per calendar day.
    #[must_use]
    pub fn theta(&self) -> f64 {
        let decay = -self.terms.spot() * norm_pdf(self.d.d1) * self.sigma
            / (2.0 * self.terms.maturity().sqrt());
        let carry = self.terms.rate() * self.terms.strike() * self.terms.discount_factor();
        let annual = match self.terms.kind() {
            OptionKind::Call => decay - carry * norm_cdf(self.d.d2),
            OptionKind::Put => decay + carry * norm_cdf(-self.d.d2),
        };
        annual / DAYS_PER_YEAR
    }

    /// Rho per 1% change in the risk-free rate.
    #[must_use]
    pub fn rho(&self) -> f64 {
        let scale = self.terms.strike() * self.terms.maturity() * self.terms.discount_factor();
        match self.terms.kind() {
            OptionKind::Call => scale * norm_cdf(self.d.d2) / PER_PERCENT,
            OptionKind::Put => -scale * norm_cdf(-self.d.d2) / PER_PERCENT,
        }
    }

    /// All Greeks at once.
    #[must_use]
    pub fn greeks(&self) -> Greeks {
        Greeks {
            delta: self.delta(),
            gamma: self.gamma(),
            vega: self.vega(),
            theta: self.theta(),
            rho: self.rho(),
        }
    }
}
