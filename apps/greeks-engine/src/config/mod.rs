//! Configuration for the greeks engine.
//!
//! Loads a YAML document with `${VAR}` / `${VAR:-default}` environment
//! variable interpolation, fills every missing section with defaults and
//! validates the result.
//!
//! # Usage
//!
//! ```rust,ignore
//! use greeks_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Access configuration values
//! println!("initial guess: {}", config.solver.initial_guess);
//! ```
//!
//! # Example
//!
//! ```yaml
//! solver:
//!   initial_guess: 0.2
//!   max_iterations: 500
//! observability:
//!   logging:
//!     level: ${GREEKS_LOG_LEVEL:-greeks_engine=info}
//!     format: compact
//! output:
//!   format: json
//! strategy:
//!   legs:
//!     - { underlying: 100, strike: 100, maturity: 1, rate: 0.05, price: 10 }
//!     - { underlying: 100, strike: 110, maturity: 1, rate: 0.05, price: 5, option: put }
//! ```

mod observability;
mod strategy;

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::IvSolverConfig;

pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};
pub use strategy::{OutputConfig, OutputFormat, StrategyConfig};

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Implied volatility solver settings.
    #[serde(default)]
    pub solver: IvSolverConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
    /// Report output configuration.
    #[serde(default)]
    pub output: OutputConfig,
    /// Legs to price. Defaults to the two-leg demo when the section is absent.
    #[serde(default)]
    pub strategy: StrategyConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become the empty string.
#[allow(clippy::expect_used)] // Regex is a compile-time constant
fn interpolate_env_vars(input: &str) -> String {
    static ENV_VAR_REGEX: OnceLock<Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("env var regex is valid")
    });

    re.replace_all(input, |caps: &Captures<'_>| {
        let default_value = caps.get(2).map_or("", |m| m.as_str());
        match std::env::var(&caps[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let solver = &config.solver;

    if !(solver.initial_guess.is_finite() && solver.initial_guess > 0.0) {
        return Err(ConfigError::ValidationError(
            "solver.initial_guess must be positive".to_string(),
        ));
    }

    if solver.max_iterations == 0 || solver.max_evaluations == 0 {
        return Err(ConfigError::ValidationError(
            "solver.max_iterations and solver.max_evaluations must be at least 1".to_string(),
        ));
    }

    for (name, value) in [
        ("x_tolerance", solver.x_tolerance),
        ("f_tolerance", solver.f_tolerance),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "solver.{name} must be non-negative"
            )));
        }
    }

    if !(solver.residual_tolerance.is_finite() && solver.residual_tolerance > 0.0) {
        return Err(ConfigError::ValidationError(
            "solver.residual_tolerance must be positive".to_string(),
        ));
    }

    if !(solver.price_tolerance.is_finite() && solver.price_tolerance > 0.0) {
        return Err(ConfigError::ValidationError(
            "solver.price_tolerance must be positive".to_string(),
        ));
    }

    let format = config.observability.logging.format.as_str();
    if !LOG_FORMATS.contains(&format) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::strategy::LegDirection;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!((config.solver.initial_guess - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.solver.max_iterations, 500);
        assert_eq!(config.observability.logging.format, "compact");
        assert_eq!(config.output.format, OutputFormat::Text);
        assert_eq!(config.strategy.legs.len(), 2);
        assert_eq!(config.strategy.legs[1].option, "put");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_load_minimal_config() {
        let yaml = r"
output:
  format: json
";

        let config = match load_config_from_string(yaml) {
            Ok(c) => c,
            Err(e) => panic!("should load minimal config: {e}"),
        };
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!((config.solver.initial_guess - 0.2).abs() < f64::EPSILON); // Default value
        assert_eq!(config.strategy, StrategyConfig::default());
    }

    #[test]
    fn test_load_legs() {
        let yaml = r"
strategy:
  legs:
    - underlying: 250
      strike: 260
      maturity: 0.25
      rate: 0.04
      price: 7.5
      option: put
      direction: short
      quantity: 2
";

        let config = load_config_from_string(yaml).unwrap();
        let leg = &config.strategy.legs[0];
        assert_eq!(config.strategy.legs.len(), 1);
        assert_eq!(leg.option, "put");
        assert_eq!(leg.direction, LegDirection::Short);
        assert_eq!(leg.quantity, 2);
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "level: ${GREEKS_CONFIG_TEST_NONEXISTENT_VAR:-debug}";
        assert_eq!(interpolate_env_vars(input), "level: debug");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        // PATH should always exist
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);

        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "format: ${GREEKS_CONFIG_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "format: ");
    }

    #[test]
    fn test_interpolated_value_reaches_config() {
        let yaml = r"
solver:
  initial_guess: ${GREEKS_CONFIG_TEST_MISSING_GUESS:-0.35}
";

        let config = load_config_from_string(yaml).unwrap();
        assert!((config.solver.initial_guess - 0.35).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation_invalid_initial_guess() {
        let yaml = r"
solver:
  initial_guess: -0.1
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for negative initial_guess");
        };
        assert!(err.to_string().contains("initial_guess"));
    }

    #[test]
    fn test_validation_zero_iterations() {
        let yaml = r"
solver:
  max_iterations: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero max_iterations");
        };
        assert!(err.to_string().contains("max_iterations"));
    }

    #[test]
    fn test_validation_zero_price_tolerance() {
        let yaml = r"
solver:
  price_tolerance: 0
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for zero price_tolerance");
        };
        assert!(err.to_string().contains("price_tolerance"));
    }

    #[test]
    fn test_validation_invalid_log_format() {
        let yaml = r"
observability:
  logging:
    format: xml
";

        let Err(err) = load_config_from_string(yaml) else {
            panic!("expected error for unknown log format");
        };
        assert!(err.to_string().contains("logging.format"));
    }

    #[test]
    fn test_unknown_output_format_is_parse_error() {
        let yaml = r"
output:
  format: html
";

        assert!(matches!(
            load_config_from_string(yaml),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "solver:\n  max_iterations: 42").unwrap();

        let config = load_config(file.path().to_str()).unwrap();
        assert_eq!(config.solver.max_iterations, 42);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Some("/nonexistent/greeks-engine/config.yaml"));
        let Err(ConfigError::ReadError { path, .. }) = result else {
            panic!("expected ReadError for a missing file");
        };
        assert!(path.contains("nonexistent"));
    }
}
