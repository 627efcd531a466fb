use super::error::PlanError;
use super::types::{ChargeWindow, NIGHT_HOURS, Schedule};

/// Best candidate seen so far during the window search.
struct Best {
    mean: f64,
    windows: Vec<ChargeWindow>,
}

impl Best {
    /// Replaces the current best only on a strict improvement, so ties keep
    /// the earliest enumerated candidate.
    fn offer(&mut self, mean: f64, windows: impl FnOnce() -> Vec<ChargeWindow>) {
        if mean < self.mean {
            self.mean = mean;
            self.windows = windows();
        }
    }
}

/// Finds the cheapest placement of `charge_hours` inside the night prefix.
///
/// Candidates are one contiguous block, or two non-overlapping blocks whose
/// sizes add up to `charge_hours`. Only the first [`NIGHT_HOURS`] prices are
/// considered; later hours are ignored even when cheaper.
///
/// Enumeration order is fixed: single blocks by ascending start, then splits
/// by ascending first-block size, first-block start and second-block start.
/// A later candidate wins only if its mean is strictly lower.
///
/// # Errors
///
/// * [`PlanError::InvalidConfiguration`] if `charge_hours` is zero or exceeds
///   [`NIGHT_HOURS`].
/// * [`PlanError::InvalidInput`] if `prices` is shorter than the night prefix
///   or the prefix contains a non-finite value.
///
/// # Examples
///
/// ```
/// use night_charge::plan::{ChargeWindow, find_optimal_charging_windows};
///
/// let prices = [40.0, 10.0, 10.0, 50.0, 5.0, 5.0, 60.0, 90.0, 90.0];
/// let schedule = find_optimal_charging_windows(&prices, 2).unwrap();
/// assert_eq!(schedule.windows(), &[ChargeWindow::new(4, 6)]);
/// assert_eq!(schedule.mean_price(), 5.0);
/// ```
pub fn find_optimal_charging_windows(
    prices: &[f64],
    charge_hours: usize,
) -> Result<Schedule, PlanError> {
    if charge_hours == 0 {
        return Err(PlanError::InvalidConfiguration(
            "charging duration must be at least 1h".into(),
        ));
    }
    if charge_hours > NIGHT_HOURS {
        return Err(PlanError::InvalidConfiguration(format!(
            "charging duration ({charge_hours}h) cannot exceed night hours ({NIGHT_HOURS}h)"
        )));
    }
    if prices.len() < NIGHT_HOURS {
        return Err(PlanError::InvalidInput(format!(
            "expected at least {NIGHT_HOURS} hourly prices, got {}",
            prices.len()
        )));
    }

    let night = &prices[..NIGHT_HOURS];
    if let Some(hour) = night.iter().position(|p| !p.is_finite()) {
        return Err(PlanError::InvalidInput(format!(
            "price at hour {hour} is not a finite number"
        )));
    }

    let hours = charge_hours as f64;
    let block_sum = |start: usize, len: usize| -> f64 { night[start..start + len].iter().sum() };

    // The block at offset 0 is always a valid candidate and seeds the search.
    let mut best = Best {
        mean: block_sum(0, charge_hours) / hours,
        windows: vec![ChargeWindow::new(0, charge_hours)],
    };

    for start in 1..=NIGHT_HOURS - charge_hours {
        let mean = block_sum(start, charge_hours) / hours;
        best.offer(mean, || vec![ChargeWindow::new(start, start + charge_hours)]);
    }

    for first_len in 1..charge_hours {
        let second_len = charge_hours - first_len;
        for first_start in 0..=NIGHT_HOURS - first_len {
            let first_end = first_start + first_len;
            let first_sum = block_sum(first_start, first_len);
            // Empty once the second block no longer fits after the first.
            for second_start in first_end..=NIGHT_HOURS - second_len {
                let mean = (first_sum + block_sum(second_start, second_len)) / hours;
                best.offer(mean, || {
                    vec![
                        ChargeWindow::new(first_start, first_end),
                        ChargeWindow::new(second_start, second_start + second_len),
                    ]
                });
            }
        }
    }

    Ok(Schedule::new(best.windows, best.mean))
}

/// Arithmetic mean of a full-day price series.
///
/// # Errors
///
/// Returns [`PlanError::InvalidInput`] for an empty series.
pub fn daily_average(prices: &[f64]) -> Result<f64, PlanError> {
    if prices.is_empty() {
        return Err(PlanError::InvalidInput(
            "daily price series is empty".into(),
        ));
    }
    Ok(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// Decides whether charging at `mean_charge_price` is worth it.
///
/// The baseline is the average of the whole day, not just the night prefix.
/// Charging is profitable iff `mean_charge_price * price_multiplier` does not
/// exceed that average.
///
/// # Errors
///
/// * [`PlanError::InvalidInput`] if `daily_prices` is empty.
/// * [`PlanError::InvalidConfiguration`] if `price_multiplier` is not a
///   positive finite number.
pub fn is_charging_profitable(
    mean_charge_price: f64,
    daily_prices: &[f64],
    price_multiplier: f64,
) -> Result<bool, PlanError> {
    if !price_multiplier.is_finite() || price_multiplier <= 0.0 {
        return Err(PlanError::InvalidConfiguration(format!(
            "price multiplier must be a positive number, got {price_multiplier}"
        )));
    }
    let average = daily_average(daily_prices)?;
    Ok(mean_charge_price * price_multiplier <= average)
}
