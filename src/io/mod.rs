/// CSV export of per-hour plans.
pub mod export;
