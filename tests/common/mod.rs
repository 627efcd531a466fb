//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use night_charge::plan::NIGHT_HOURS;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Hours in a regular (non-DST) day.
pub const HOURS_PER_DAY: usize = 24;

/// A full day whose night prefix is `night` and every later hour costs `rest`.
pub fn day_with_night(night: [f64; NIGHT_HOURS], rest: f64) -> Vec<f64> {
    let mut prices = night.to_vec();
    prices.extend(std::iter::repeat_n(rest, HOURS_PER_DAY - NIGHT_HOURS));
    prices
}

/// Cheap block at hours 4-5, expensive daytime.
pub fn scenario_day() -> Vec<f64> {
    day_with_night([40.0, 10.0, 10.0, 50.0, 5.0, 5.0, 60.0], 90.0)
}

/// Seeded generator so randomized checks are reproducible.
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Random day-ahead curve in EUR/MWh, including occasional negative hours.
pub fn random_day(rng: &mut StdRng) -> Vec<f64> {
    (0..HOURS_PER_DAY)
        .map(|_| (rng.random_range(-20.0..250.0_f64) * 100.0).round() / 100.0)
        .collect()
}

/// Writes `content` to `name` inside `dir` and returns the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("fixture file should be writable");
    path
}

/// Renders prices as a `hour,price` CSV document.
pub fn prices_csv(prices: &[f64]) -> String {
    let mut out = String::from("hour,price\n");
    for (hour, price) in prices.iter().enumerate() {
        out.push_str(&format!("{hour},{price}\n"));
    }
    out
}

/// Renders prices as an OTE chart-data JSON document.
pub fn ote_chart_json(prices: &[f64]) -> String {
    let points = |values: &[f64]| -> Vec<serde_json::Value> {
        values
            .iter()
            .enumerate()
            .map(|(i, y)| serde_json::json!({ "x": (i + 1).to_string(), "y": y }))
            .collect()
    };
    let volumes = vec![3000.0; prices.len()];
    serde_json::json!({
        "data": {
            "dataLine": [
                { "title": "Quantity (MWh)", "point": points(&volumes) },
                { "title": "Price (EUR/MWh)", "point": points(prices) }
            ]
        }
    })
    .to_string()
}
