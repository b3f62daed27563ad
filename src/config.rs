use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Tunables for the detection engine.
///
/// Monetary fields are decimals and should be written as strings in TOML
/// (`fee_rate = "0.02"`) to avoid binary-float round-off in config files.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Maximum Frank-Wolfe iterations per projection.
    #[serde(default = "default_fw_max_iters")]
    pub fw_max_iters: usize,

    /// Duality-gap threshold for projection convergence.
    #[serde(default = "default_fw_tolerance")]
    pub fw_tolerance: f64,

    /// Flat fee charged per unit of notional traded.
    #[serde(default = "default_fee_rate")]
    pub fee_rate: Decimal,

    /// Minimum expected net dollars required to emit an opportunity.
    #[serde(default = "default_min_profit_usd")]
    pub min_profit_usd: Decimal,

    /// Total capital deployed per opportunity.
    #[serde(default = "default_trade_notional_usd")]
    pub trade_notional_usd: Decimal,
}

fn default_fw_max_iters() -> usize {
    150
}

fn default_fw_tolerance() -> f64 {
    1e-8
}

fn default_fee_rate() -> Decimal {
    Decimal::new(2, 2) // 0.02
}

fn default_min_profit_usd() -> Decimal {
    Decimal::new(50, 2) // 0.50
}

fn default_trade_notional_usd() -> Decimal {
    Decimal::new(100, 0)
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            fw_max_iters: default_fw_max_iters(),
            fw_tolerance: default_fw_tolerance(),
            fee_rate: default_fee_rate(),
            min_profit_usd: default_min_profit_usd(),
            trade_notional_usd: default_trade_notional_usd(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let detector = &self.detector;

        if detector.fw_max_iters == 0 {
            return Err(Error::Config("fw_max_iters must be positive".into()));
        }
        if detector.fw_tolerance <= 0.0 {
            return Err(Error::Config("fw_tolerance must be positive".into()));
        }
        if detector.fee_rate < Decimal::ZERO || detector.fee_rate >= Decimal::ONE {
            return Err(Error::Config("fee_rate must be in [0, 1)".into()));
        }
        if detector.trade_notional_usd <= Decimal::ZERO {
            return Err(Error::Config("trade_notional_usd must be positive".into()));
        }

        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
