//! Greeks Engine Binary
//!
//! Prices the configured strategy and prints per-leg implied volatilities,
//! Greeks and their aggregates.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin greeks-engine -- [CONFIG_PATH]
//! ```
//!
//! # Configuration
//!
//! The config file is taken from the first argument, then
//! `GREEKS_ENGINE_CONFIG`, then `config.yaml` when it exists. Without any of
//! these the built-in two-leg demo is priced.
//!
//! # Environment Variables
//!
//! - `GREEKS_ENGINE_CONFIG`: Path to the YAML config file
//! - `RUST_LOG`: Log filter (default: `observability.logging.level`)

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use greeks_engine::config::{
    Config, DEFAULT_CONFIG_PATH, LoggingConfig, OutputFormat, load_config,
};
use greeks_engine::{Greeks, IvSolver, Leg, LegDirection, Strategy};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the config file.
const CONFIG_ENV_VAR: &str = "GREEKS_ENGINE_CONFIG";

/// JSON report printed with `output.format: json`.
#[derive(Serialize)]
struct Report<'a> {
    legs: &'a [Leg],
    aggregate: Greeks,
    net_premium: f64,
}

fn main() -> Result<()> {
    load_dotenv();

    let config_path = resolve_config_path();
    let config = match config_path.as_deref() {
        Some(path) => load_config(Some(path))
            .with_context(|| format!("failed to load configuration from '{path}'"))?,
        None => Config::default(),
    };

    init_tracing(&config.observability.logging)?;

    tracing::info!(
        config = config_path.as_deref().unwrap_or("<defaults>"),
        legs = config.strategy.legs.len(),
        "Configuration loaded"
    );

    let solver = IvSolver::new(config.solver);
    let strategy = Strategy::from_specs(&config.strategy.legs, &solver)
        .context("failed to build strategy")?;

    match config.output.format {
        OutputFormat::Text => print_table(&strategy),
        OutputFormat::Json => print_json(&strategy)?,
    }

    tracing::info!(legs = strategy.len(), "Strategy priced");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Pick the config file: CLI argument, then env var, then `config.yaml`.
fn resolve_config_path() -> Option<String> {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().filter(|v| !v.is_empty()))
        .or_else(|| {
            Path::new(DEFAULT_CONFIG_PATH)
                .exists()
                .then(|| DEFAULT_CONFIG_PATH.to_string())
        })
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("invalid log filter '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        "pretty" => builder.pretty().try_init(),
        _ => builder.compact().try_init(),
    };

    installed.map_err(|e| anyhow!("failed to initialise tracing: {e}"))
}

/// Print one row per leg followed by the aggregate line.
fn print_table(strategy: &Strategy) {
    println!(
        "{:>3} {:<4} {:<5} {:>3} {:>9} {:>9} {:>6} {:>7} {:>9} {:>8} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "#", "kind", "side", "qty", "spot", "strike", "T", "rate", "price", "sigma", "delta",
        "gamma", "vega", "theta", "rho"
    );

    for (i, leg) in strategy.legs().iter().enumerate() {
        let terms = leg.terms();
        let position = leg.position();
        let side = match position.direction() {
            LegDirection::Long => "long",
            LegDirection::Short => "short",
        };
        println!(
            "{:>3} {:<4} {:<5} {:>3} {:>9.2} {:>9.2} {:>6.3} {:>7.4} {:>9.4} {:>8.4} {:>9.4} {:>9.5} {:>9.4} {:>9.5} {:>9.4}",
            i + 1,
            terms.kind().as_str(),
            side,
            position.quantity(),
            terms.spot(),
            terms.strike(),
            terms.maturity(),
            terms.rate(),
            leg.quoted_price(),
            leg.sigma(),
            leg.delta(),
            leg.gamma(),
            leg.vega(),
            leg.theta(),
            leg.rho(),
        );
    }

    let total = strategy.greeks();
    println!();
    println!(
        "strategy: delta {:.4}  gamma {:.5}  vega {:.4}  theta {:.5}  rho {:.4}  net premium {:.2}",
        total.delta,
        total.gamma,
        total.vega,
        total.theta,
        total.rho,
        strategy.net_premium()
    );
}

/// Print the strategy as a single JSON document.
fn print_json(strategy: &Strategy) -> Result<()> {
    let report = Report {
        legs: strategy.legs(),
        aggregate: strategy.greeks(),
        net_premium: strategy.net_premium(),
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{json}");
    Ok(())
}
