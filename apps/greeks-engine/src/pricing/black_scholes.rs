//! Black-Scholes pricing.
//!
//! `DTerms` is the single d1/d2 computation shared by the pricing model and
//! the risk calculator, so a price and the Greeks derived from the same
//! inputs never drift apart.

use super::normal::norm_cdf;
use super::terms::{ContractTerms, OptionKind};
use crate::error::{PricingResult, ensure_positive};

/// Standardised Black-Scholes quantities for one (terms, sigma) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DTerms {
    /// d1 = (ln(S/K) + (r + sigma^2/2)T) / (sigma sqrt(T))
    pub d1: f64,
    /// d2 = d1 - sigma sqrt(T)
    pub d2: f64,
    /// sigma sqrt(T)
    pub sigma_sqrt_t: f64,
}

impl DTerms {
    /// Compute d1 and d2. Fails when sigma is not strictly positive.
    pub fn compute(terms: &ContractTerms, sigma: f64) -> PricingResult<Self> {
        let sigma = ensure_positive("sigma", sigma)?;
        let sigma_sqrt_t = sigma * terms.maturity().sqrt();
        let d1 = ((terms.spot() / terms.strike()).ln()
            + (terms.rate() + 0.5 * sigma * sigma) * terms.maturity())
            / sigma_sqrt_t;

        Ok(Self {
            d1,
            d2: d1 - sigma_sqrt_t,
            sigma_sqrt_t,
        })
    }
}

/// European option pricing model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingModel {
    terms: ContractTerms,
}

impl PricingModel {
    /// Create a pricing model for the given contract.
    #[must_use]
    pub const fn new(terms: ContractTerms) -> Self {
        Self { terms }
    }

    /// Contract being priced.
    #[must_use]
    pub const fn terms(&self) -> &ContractTerms {
        &self.terms
    }

    /// Theoretical premium at volatility `sigma`.
    ///
    /// call = S N(d1) - K e^(-rT) N(d2)
    /// put  = K e^(-rT) N(-d2) - S N(-d1)
    pub fn price(&self, sigma: f64) -> PricingResult<f64> {
        let d = DTerms::compute(&self.terms, sigma)?;
        Ok(self.price_from(&d))
    }

    pub(crate) fn price_from(&self, d: &DTerms) -> f64 {
        let s = self.terms.spot();
        let discounted_strike = self.terms.strike() * self.terms.discount_factor();
        match self.terms.kind() {
            OptionKind::Call => s * norm_cdf(d.d1) - discounted_strike * norm_cdf(d.d2),
            OptionKind::Put => discounted_strike * norm_cdf(-d.d2) - s * norm_cdf(-d.d1),
        }
    }

    /// No-arbitrage premium bounds `(lower, upper)`.
    ///
    /// Any quote outside these bounds has no implied volatility.
    #[must_use]
    pub fn intrinsic_bounds(&self) -> (f64, f64) {
        let s = self.terms.spot();
        let discounted_strike = self.terms.strike() * self.terms.discount_factor();
        match self.terms.kind() {
            OptionKind::Call => ((s - discounted_strike).max(0.0), s),
            OptionKind::Put => ((discounted_strike - s).max(0.0), discounted_strike),
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::error::PricingError;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    fn atm(kind: OptionKind) -> PricingModel {
        PricingModel::new(ContractTerms::new(100.0, 100.0, 1.0, 0.05, kind).unwrap())
    }

    #[test]
    fn test_d_terms() {
        let terms = ContractTerms::new(100.0, 100.0, 1.0, 0.05, OptionKind::Call).unwrap();
        let d = DTerms::compute(&terms, 0.2).unwrap();
        // (0 + 0.07) / 0.2
        assert!(approx_eq(d.d1, 0.35, 1e-12));
        assert!(approx_eq(d.d2, 0.15, 1e-12));
        assert!(approx_eq(d.sigma_sqrt_t, 0.2, 1e-12));
    }

    #[test]
    fn test_call_atm_reference_price() {
        let price = atm(OptionKind::Call).price(0.2).unwrap();
        assert!(approx_eq(price, 10.4506, 1e-4));
    }

    #[test]
    fn test_put_atm_reference_price() {
        let price = atm(OptionKind::Put).price(0.2).unwrap();
        assert!(approx_eq(price, 5.5735, 1e-4));
    }

    #[test]
    fn test_non_positive_sigma_rejected() {
        for sigma in [0.0, -0.2, f64::NAN] {
            let Err(PricingError::InvalidParameter { name, .. }) = atm(OptionKind::Call).price(sigma)
            else {
                panic!("sigma {sigma} should be rejected");
            };
            assert_eq!(name, "sigma");
        }
    }

    #[test]
    fn test_intrinsic_bounds() {
        let terms = ContractTerms::new(120.0, 100.0, 0.5, 0.05, OptionKind::Call).unwrap();
        let (lower, upper) = PricingModel::new(terms).intrinsic_bounds();
        assert!(approx_eq(lower, 120.0 - 100.0 * (-0.025_f64).exp(), 1e-12));
        assert!(approx_eq(upper, 120.0, 1e-12));

        let (lower, _) = PricingModel::new(terms.with_kind(OptionKind::Put)).intrinsic_bounds();
        assert_eq!(lower, 0.0);
    }

    #[test]
    fn test_price_within_bounds() {
        for kind in [OptionKind::Call, OptionKind::Put] {
            let model = atm(kind);
            let (lower, upper) = model.intrinsic_bounds();
            for sigma in [0.01, 0.2, 1.0, 3.0] {
                let price = model.price(sigma).unwrap();
                assert!(price >= lower - 1e-9 && price <= upper + 1e-9);
            }
        }
    }

    proptest! {
        #[test]
        fn prop_put_call_parity(
            spot in 10.0f64..500.0,
            strike in 10.0f64..500.0,
            maturity in 0.01f64..5.0,
            rate in -0.02f64..0.15,
            sigma in 0.01f64..2.0,
        ) {
            let call_terms = ContractTerms::new(spot, strike, maturity, rate, OptionKind::Call).unwrap();
            let call = PricingModel::new(call_terms).price(sigma).unwrap();
            let put = PricingModel::new(call_terms.with_kind(OptionKind::Put)).price(sigma).unwrap();
            let forward_gap = spot - strike * (-rate * maturity).exp();
            prop_assert!((call - put - forward_gap).abs() < 1e-6 * spot.max(strike));
        }

        #[test]
        fn prop_call_price_increases_with_sigma(
            spot in 70.0f64..130.0,
            sigma in 0.1f64..1.0,
        ) {
            let model = PricingModel::new(
                ContractTerms::new(spot, 100.0, 1.0, 0.05, OptionKind::Call).unwrap(),
            );
            let lo = model.price(sigma).unwrap();
            let hi = model.price(sigma + 0.05).unwrap();
            prop_assert!(hi > lo);
        }
    }
}
