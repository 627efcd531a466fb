//! Daily planning run: fetch prices, plan, dispatch.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::PlannerConfig;
use crate::plan::{
    ChargeCommand, NIGHT_HOURS, NightWindowConfig, PlanError, Schedule, daily_average,
    find_optimal_charging_windows, is_charging_profitable,
};
use crate::prices::{PriceError, PriceSource};
use crate::scheduler::{ChargeScheduler, DispatchError, ScheduleRequest, dispatch_with_retry};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("cannot load prices: {0}")]
    Prices(#[from] PriceError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Everything decided for one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayPlan {
    /// Full-day hourly prices the plan was computed from.
    pub prices: Vec<f64>,
    /// Cheapest night windows, whether or not they are used.
    pub schedule: Schedule,
    /// Average over the whole day.
    pub daily_average: f64,
    pub profitable: bool,
    /// Instruction for the battery scheduler.
    pub command: ChargeCommand,
}

/// One hour of a [`DayPlan`], as exported and served.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourRecord {
    pub hour: usize,
    pub price: f64,
    /// Inside the night prefix eligible for charging.
    pub night: bool,
    pub charging: bool,
}

impl DayPlan {
    /// Whether the battery draws grid power at `hour`.
    pub fn is_charging_at(&self, hour: usize) -> bool {
        self.profitable && self.schedule.is_charging_at(hour)
    }

    /// Per-hour view of the plan over the full price series.
    pub fn hours(&self) -> Vec<HourRecord> {
        self.prices
            .iter()
            .enumerate()
            .map(|(hour, &price)| HourRecord {
                hour,
                price,
                night: hour < NIGHT_HOURS,
                charging: self.is_charging_at(hour),
            })
            .collect()
    }
}

/// Result of [`run_once`].
#[derive(Debug, Clone)]
pub struct RunReport {
    pub plan: DayPlan,
    /// Scheduler calls needed to deliver the command.
    pub attempts: u32,
}

/// Plans one day from an hourly price series.
///
/// # Errors
///
/// Propagates [`PlanError`] from the optimizer and the profitability check.
pub fn plan_day(prices: Vec<f64>, config: &NightWindowConfig) -> Result<DayPlan, PlanError> {
    let schedule = find_optimal_charging_windows(&prices, config.charge_hours)?;
    let profitable =
        is_charging_profitable(schedule.mean_price(), &prices, config.price_multiplier)?;
    let daily_average = daily_average(&prices)?;
    let command = ChargeCommand::from_schedule(&schedule, profitable);

    Ok(DayPlan {
        prices,
        schedule,
        daily_average,
        profitable,
        command,
    })
}

/// Runs one planning cycle: load prices, plan, hand the command downstream.
///
/// # Errors
///
/// Returns [`RunError`] if prices cannot be loaded, the plan is invalid, or
/// the scheduler rejects the command on every attempt.
pub fn run_once<P, S>(
    config: &PlannerConfig,
    source: &P,
    scheduler: &mut S,
) -> Result<RunReport, RunError>
where
    P: PriceSource + ?Sized,
    S: ChargeScheduler + ?Sized,
{
    let prices = source.hourly_prices()?;
    debug!(hours = prices.len(), "Loaded day-ahead prices");

    let plan = plan_day(prices, &config.night_window())?;
    info!("Found optimal charging window(s): {} EUR/MWh", plan.schedule);

    if plan.profitable {
        info!(
            daily_average = plan.daily_average,
            "Charging is profitable - {}", plan.command
        );
    } else {
        info!(
            daily_average = plan.daily_average,
            multiplier = config.planner.price_multiplier,
            "Charging is not profitable - disabling charging schedule"
        );
    }

    let request = ScheduleRequest {
        serial_number: config.scheduler.serial_number.clone(),
        battery_high_cap: config.scheduler.battery_high_cap,
        command: plan.command.clone(),
    };
    let attempts = dispatch_with_retry(scheduler, &request, &config.scheduler.retry_policy())?;

    Ok(RunReport { plan, attempts })
}
