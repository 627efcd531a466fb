//! API response and query types.

use serde::{Deserialize, Serialize};

use crate::plan::{ChargeCommand, ChargeWindow};
use crate::runner::DayPlan;

/// Summary of the day's decision.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Cheapest night windows found.
    pub windows: Vec<ChargeWindow>,
    /// Mean price over the windows.
    pub mean_price: f64,
    /// Average over the full day.
    pub daily_average: f64,
    pub profitable: bool,
    /// Instruction handed to the battery scheduler.
    pub command: ChargeCommand,
}

impl From<&DayPlan> for PlanResponse {
    fn from(plan: &DayPlan) -> Self {
        Self {
            windows: plan.schedule.windows().to_vec(),
            mean_price: plan.schedule.mean_price(),
            daily_average: plan.daily_average,
            profitable: plan.profitable,
            command: plan.command.clone(),
        }
    }
}

/// Optional range query parameters for the prices endpoint.
#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    /// First hour (inclusive).
    pub from: Option<usize>,
    /// Last hour (inclusive).
    pub to: Option<usize>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
