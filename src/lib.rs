//! Day-ahead price based night charging planner for home batteries.

/// REST API for the computed plan (feature `api`).
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod io;
/// Pure charging-window planning.
pub mod plan;
pub mod prices;
pub mod runner;
pub mod scheduler;
