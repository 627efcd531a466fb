//! TOML-based planner configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::plan::{NIGHT_HOURS, NightWindowConfig};
use crate::scheduler::RetryPolicy;

/// Top-level planner configuration parsed from TOML.
///
/// Every table is optional and falls back to its defaults. Load with
/// [`PlannerConfig::from_toml_file`]; call [`PlannerConfig::validate`] before
/// handing values to the planner.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlannerConfig {
    /// Charging duration and profitability margin.
    #[serde(default)]
    pub planner: PlannerSection,
    /// Where the day-ahead prices come from.
    #[serde(default)]
    pub prices: PricesSection,
    /// Downstream battery scheduler parameters.
    #[serde(default)]
    pub scheduler: SchedulerSection,
}

/// Charging duration and profitability margin.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerSection {
    /// Hours needed to charge the battery to full (1..=7).
    pub charge_hours: usize,
    /// Charging must cost at most `daily_average / price_multiplier`.
    pub price_multiplier: f64,
}

impl Default for PlannerSection {
    fn default() -> Self {
        Self {
            charge_hours: 3,
            price_multiplier: 1.0,
        }
    }
}

/// Price file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFormat {
    /// CSV with a `price` column.
    #[default]
    Csv,
    /// OTE day-ahead chart-data JSON.
    OteJson,
}

/// Price input parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricesSection {
    pub format: PriceFormat,
    /// Path to the price file.
    pub path: PathBuf,
    /// Minutes per price point: 60, or 15 for quarter-hour feeds.
    pub resolution_minutes: u32,
}

impl Default for PricesSection {
    fn default() -> Self {
        Self {
            format: PriceFormat::Csv,
            path: PathBuf::from("prices.csv"),
            resolution_minutes: 60,
        }
    }
}

/// Downstream battery scheduler parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerSection {
    /// Serial number of the battery system.
    pub serial_number: String,
    /// Charge ceiling in percent of capacity.
    pub battery_high_cap: u8,
    /// Attempts before giving up on the scheduler (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry.
    pub backoff_ms: u64,
    /// Write the request to this JSON file instead of only logging it.
    pub command_out: Option<PathBuf>,
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            serial_number: String::new(),
            battery_high_cap: 100,
            max_attempts: 3,
            backoff_ms: 1000,
            command_out: None,
        }
    }
}

impl SchedulerSection {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.backoff_ms))
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"planner.charge_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl PlannerConfig {
    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Charging parameters for the planning core.
    pub fn night_window(&self) -> NightWindowConfig {
        NightWindowConfig::new(self.planner.charge_hours, self.planner.price_multiplier)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let p = &self.planner;
        if !(1..=NIGHT_HOURS).contains(&p.charge_hours) {
            errors.push(ConfigError::new(
                "planner.charge_hours",
                format!("must be in [1, {NIGHT_HOURS}], got {}", p.charge_hours),
            ));
        }
        if !p.price_multiplier.is_finite() || p.price_multiplier <= 0.0 {
            errors.push(ConfigError::new("planner.price_multiplier", "must be > 0"));
        }

        let pr = &self.prices;
        if pr.resolution_minutes != 60 && pr.resolution_minutes != 15 {
            errors.push(ConfigError::new(
                "prices.resolution_minutes",
                format!("must be 60 or 15, got {}", pr.resolution_minutes),
            ));
        }
        if pr.path.as_os_str().is_empty() {
            errors.push(ConfigError::new("prices.path", "must not be empty"));
        }

        let s = &self.scheduler;
        if !(1..=100).contains(&s.battery_high_cap) {
            errors.push(ConfigError::new(
                "scheduler.battery_high_cap",
                "must be in [1, 100]",
            ));
        }
        if s.max_attempts == 0 {
            errors.push(ConfigError::new("scheduler.max_attempts", "must be >= 1"));
        }

        errors
    }
}
