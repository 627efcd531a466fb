//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::{PlannerConfig, PriceFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    OteJson,
}

impl From<FormatArg> for PriceFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => PriceFormat::Csv,
            FormatArg::OteJson => PriceFormat::OteJson,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "night-charge")]
#[command(version, about = "Plans cheap night-time grid charging for a home battery")]
#[command(
    long_about = "Finds the cheapest one or two charging windows in the first 7 hours of the \
    day-ahead price curve and enables grid charging only when that price, times the \
    configured multiplier, does not exceed the day's average.\n\
    \nExamples:\n  \
    night-charge --config ess.toml\n  \
    night-charge --prices prices.csv --charge-hours 3 --dry-run\n  \
    night-charge --prices ote.json --format ote-json --plan-out plan.csv"
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Price file, overrides `prices.path`
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// Price file format, overrides `prices.format`
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Hours needed to charge to full, overrides `planner.charge_hours`
    #[arg(long)]
    pub charge_hours: Option<usize>,

    /// Profitability margin, overrides `planner.price_multiplier`
    #[arg(long)]
    pub price_multiplier: Option<f64>,

    /// Write the scheduler request as JSON to this file
    #[arg(long, conflicts_with = "dry_run")]
    pub command_out: Option<PathBuf>,

    /// Export the hourly plan as CSV to this file
    #[arg(long)]
    pub plan_out: Option<PathBuf>,

    /// Only log the scheduler request, ignoring `scheduler.command_out`
    #[arg(long)]
    pub dry_run: bool,

    /// Serve the plan over HTTP after the run
    #[cfg(feature = "api")]
    #[arg(long)]
    pub serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut PlannerConfig) {
        if let Some(path) = &self.prices {
            config.prices.path.clone_from(path);
        }
        if let Some(format) = self.format {
            config.prices.format = format.into();
        }
        if let Some(hours) = self.charge_hours {
            config.planner.charge_hours = hours;
        }
        if let Some(multiplier) = self.price_multiplier {
            config.planner.price_multiplier = multiplier;
        }
        if self.dry_run {
            config.scheduler.command_out = None;
        } else if let Some(path) = &self.command_out {
            config.scheduler.command_out = Some(path.clone());
        }
    }
}
