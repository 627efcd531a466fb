//! Errors raised by the planning core before any computation runs.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Charging parameters that can never produce a schedule.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Price data the planner cannot work with.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}
