//! Strategy and report output configuration.

use serde::{Deserialize, Serialize};

use crate::strategy::LegSpec;

/// Legs to price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    /// Leg descriptions, in order.
    #[serde(default)]
    pub legs: Vec<LegSpec>,
}

impl Default for StrategyConfig {
    /// A call and a put on the same underlying with different strikes.
    fn default() -> Self {
        Self {
            legs: vec![
                LegSpec::new(100.0, 100.0, 1.0, 0.05, 10.0, "call"),
                LegSpec::new(100.0, 110.0, 1.0, 0.05, 5.0, "put"),
            ],
        }
    }
}

/// Report format printed by the binary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Report output configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format.
    #[serde(default)]
    pub format: OutputFormat,
}
