//! Strategy type definitions.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info_span};

use crate::error::PricingResult;
use crate::pricing::IvSolver;
use crate::risk::Greeks;

use super::leg::{Leg, LegSpec};

/// An ordered collection of legs.
///
/// Aggregates are plain sums of each leg's cached position Greeks; nothing is
/// recomputed and no leg is mutated. An empty strategy aggregates to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Strategy {
    legs: Vec<Leg>,
}

impl Strategy {
    /// Assemble a strategy from already-built legs.
    #[must_use]
    pub const fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    /// Build every leg in parallel and assemble the strategy.
    ///
    /// Fails with the error of the first failing spec (in input order); no
    /// strategy is produced unless every leg builds.
    pub fn from_specs(specs: &[LegSpec], solver: &IvSolver) -> PricingResult<Self> {
        let span = info_span!("strategy.build", legs = specs.len());
        let _enter = span.enter();

        // Rayon workers do not inherit the caller's current span.
        let built: Vec<PricingResult<Leg>> = specs
            .par_iter()
            .map(|spec| span.in_scope(|| spec.build(solver)))
            .collect();
        let legs = built.into_iter().collect::<PricingResult<Vec<_>>>()?;

        debug!(legs = legs.len(), "strategy assembled");
        Ok(Self::new(legs))
    }

    /// Legs in insertion order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Number of legs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// True when the strategy has no legs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Aggregate Greeks across all legs.
    #[must_use]
    pub fn greeks(&self) -> Greeks {
        self.legs.iter().map(Leg::position_greeks).sum()
    }

    /// Aggregate delta.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.greeks().delta
    }

    /// Aggregate gamma.
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.greeks().gamma
    }

    /// Aggregate vega.
    #[must_use]
    pub fn vega(&self) -> f64 {
        self.greeks().vega
    }

    /// Aggregate theta.
    #[must_use]
    pub fn theta(&self) -> f64 {
        self.greeks().theta
    }

    /// Aggregate rho.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.greeks().rho
    }

    /// Net premium (positive = credit, negative = debit).
    #[must_use]
    pub fn net_premium(&self) -> f64 {
        self.legs.iter().map(Leg::net_premium).sum()
    }
}

impl FromIterator<Leg> for Strategy {
    fn from_iter<I: IntoIterator<Item = Leg>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
