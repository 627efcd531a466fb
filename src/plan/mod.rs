//! Charging-window decision logic.
//!
//! Everything in here is pure: callers hand in an already-fetched price
//! series and get back a [`Schedule`] and a [`ChargeCommand`]. Nothing in
//! this module logs, sleeps or touches the filesystem.

/// Downstream instruction built from a schedule.
pub mod command;
pub mod error;
/// Cheapest-window search and profitability check.
pub mod optimizer;
pub mod types;

pub use command::{ChargeCommand, TimeSlot};
pub use error::PlanError;
pub use optimizer::{daily_average, find_optimal_charging_windows, is_charging_profitable};
pub use types::{ChargeWindow, NIGHT_HOURS, NightWindowConfig, Schedule};
