//! Multi-leg option strategies.
//!
//! A [`Leg`] resolves its own implied volatility from a quoted premium and
//! caches its Greeks; a [`Strategy`] sums those cached figures.

mod leg;
mod types;

pub use leg::{Leg, LegDirection, LegSpec, Position};
pub use types::Strategy;
