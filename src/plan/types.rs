//! Core planning types: night window parameters, charge windows and schedules.

use std::fmt;

use serde::Serialize;

/// Length of the early-day prefix eligible for cheap charging (hours).
pub const NIGHT_HOURS: usize = 7;

/// Charging parameters for one planning run.
///
/// # Examples
///
/// ```
/// use night_charge::plan::types::NightWindowConfig;
///
/// let cfg = NightWindowConfig::new(3, 1.2);
/// assert_eq!(cfg.charge_hours, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NightWindowConfig {
    /// Total hours the battery must charge (1..=`NIGHT_HOURS`).
    pub charge_hours: usize,
    /// Profitability margin applied to the charging price.
    pub price_multiplier: f64,
}

impl NightWindowConfig {
    pub fn new(charge_hours: usize, price_multiplier: f64) -> Self {
        Self {
            charge_hours,
            price_multiplier,
        }
    }
}

/// Half-open hour range `[start, end)` inside the night prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChargeWindow {
    pub start: usize,
    pub end: usize,
}

impl ChargeWindow {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start < end, "charge window must be non-empty");
        Self { start, end }
    }

    /// Number of hours covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, hour: usize) -> bool {
        (self.start..self.end).contains(&hour)
    }
}

impl fmt::Display for ChargeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Chosen charge windows (one or two, sorted by start) and their mean price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    windows: Vec<ChargeWindow>,
    mean_price: f64,
}

impl Schedule {
    pub(crate) fn new(windows: Vec<ChargeWindow>, mean_price: f64) -> Self {
        Self {
            windows,
            mean_price,
        }
    }

    pub fn windows(&self) -> &[ChargeWindow] {
        &self.windows
    }

    /// Mean price over all covered hours.
    pub fn mean_price(&self) -> f64 {
        self.mean_price
    }

    /// Total hours covered by all windows.
    pub fn covered_hours(&self) -> usize {
        self.windows.iter().map(ChargeWindow::len).sum()
    }

    /// Whether `hour` falls inside any window.
    pub fn is_charging_at(&self, hour: usize) -> bool {
        self.windows.iter().any(|w| w.contains(hour))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let windows: Vec<String> = self.windows.iter().map(ToString::to_string).collect();
        write!(
            f,
            "{} with mean price {:.1}",
            windows.join(", "),
            self.mean_price
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_len_and_contains() {
        let w = ChargeWindow::new(2, 5);
        assert_eq!(w.len(), 3);
        assert!(w.contains(2));
        assert!(w.contains(4));
        assert!(!w.contains(5));
    }

    #[test]
    fn schedule_reports_covered_hours() {
        let schedule = Schedule::new(vec![ChargeWindow::new(0, 1), ChargeWindow::new(3, 5)], 12.5);
        assert_eq!(schedule.covered_hours(), 3);
        assert!(schedule.is_charging_at(0));
        assert!(!schedule.is_charging_at(2));
        assert!(schedule.is_charging_at(4));
    }

    #[test]
    fn schedule_display_lists_windows() {
        let schedule = Schedule::new(vec![ChargeWindow::new(2, 3), ChargeWindow::new(6, 7)], 25.5);
        assert_eq!(schedule.to_string(), "2-3, 6-7 with mean price 25.5");
    }
}
