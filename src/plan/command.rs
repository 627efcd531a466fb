use std::fmt;

use serde::Serialize;

use super::types::{ChargeWindow, Schedule};

/// Time-of-day boundary used by the downstream scheduler for "no charging".
pub const MIDNIGHT: &str = "00:00";

/// A `start -> end` pair of `HH:00` strings as understood by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    /// The zero-duration `00:00 -> 00:00` sentinel.
    pub fn midnight() -> Self {
        Self {
            start: MIDNIGHT.to_string(),
            end: MIDNIGHT.to_string(),
        }
    }

    pub fn from_window(window: &ChargeWindow) -> Self {
        Self {
            start: hour_mark(window.start),
            end: hour_mark(window.end),
        }
    }

    pub fn is_midnight(&self) -> bool {
        self.start == MIDNIGHT && self.end == MIDNIGHT
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn hour_mark(hour: usize) -> String {
    format!("{hour:02}:00")
}

/// Charging instruction for the downstream battery scheduler.
///
/// The scheduler accepts at most two time slots; unused slots carry the
/// midnight sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeCommand {
    /// Whether the battery may draw grid power.
    pub grid_charge: bool,
    pub first: TimeSlot,
    pub second: TimeSlot,
}

impl ChargeCommand {
    /// Charging off, both slots set to the midnight sentinel.
    pub fn disabled() -> Self {
        Self {
            grid_charge: false,
            first: TimeSlot::midnight(),
            second: TimeSlot::midnight(),
        }
    }

    /// Translates a schedule and profitability decision into a command.
    ///
    /// # Examples
    ///
    /// ```
    /// use night_charge::plan::{ChargeCommand, find_optimal_charging_windows};
    ///
    /// let prices = [40.0, 10.0, 10.0, 50.0, 5.0, 5.0, 60.0];
    /// let schedule = find_optimal_charging_windows(&prices, 2).unwrap();
    /// let cmd = ChargeCommand::from_schedule(&schedule, true);
    /// assert!(cmd.grid_charge);
    /// assert_eq!(cmd.first.start, "04:00");
    /// assert_eq!(cmd.first.end, "06:00");
    /// assert!(cmd.second.is_midnight());
    /// ```
    pub fn from_schedule(schedule: &Schedule, profitable: bool) -> Self {
        if !profitable {
            return Self::disabled();
        }

        let mut slots = schedule.windows().iter().map(TimeSlot::from_window);
        Self {
            grid_charge: true,
            first: slots.next().unwrap_or_else(TimeSlot::midnight),
            second: slots.next().unwrap_or_else(TimeSlot::midnight),
        }
    }
}

impl fmt::Display for ChargeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.grid_charge {
            write!(f, "charge enabled: {}, {}", self.first, self.second)
        } else {
            write!(f, "charge disabled")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule(windows: &[(usize, usize)]) -> Schedule {
        let windows = windows
            .iter()
            .map(|&(start, end)| ChargeWindow::new(start, end))
            .collect();
        Schedule::new(windows, 10.0)
    }

    #[test]
    fn unprofitable_disables_both_slots() {
        let cmd = ChargeCommand::from_schedule(&schedule(&[(1, 3), (5, 6)]), false);
        assert!(!cmd.grid_charge);
        assert!(cmd.first.is_midnight());
        assert!(cmd.second.is_midnight());
        assert_eq!(cmd, ChargeCommand::disabled());
    }

    #[test]
    fn single_window_fills_second_slot_with_midnight() {
        let cmd = ChargeCommand::from_schedule(&schedule(&[(2, 5)]), true);
        assert!(cmd.grid_charge);
        assert_eq!(cmd.first.start, "02:00");
        assert_eq!(cmd.first.end, "05:00");
        assert!(cmd.second.is_midnight());
    }

    #[test]
    fn two_windows_fill_both_slots() {
        let cmd = ChargeCommand::from_schedule(&schedule(&[(0, 1), (6, 7)]), true);
        assert_eq!(cmd.first, TimeSlot::from_window(&ChargeWindow::new(0, 1)));
        assert_eq!(cmd.first.to_string(), "00:00-01:00");
        assert_eq!(cmd.second.to_string(), "06:00-07:00");
    }

    #[test]
    fn display_summarises_command() {
        let cmd = ChargeCommand::from_schedule(&schedule(&[(3, 5)]), true);
        assert_eq!(cmd.to_string(), "charge enabled: 03:00-05:00, 00:00-00:00");
        assert_eq!(ChargeCommand::disabled().to_string(), "charge disabled");
    }
}
