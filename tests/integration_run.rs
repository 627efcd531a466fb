//! End-to-end planning runs from price files to scheduler output.

mod common;

use std::fs;
use std::time::Duration;

use night_charge::config::{PlannerConfig, PriceFormat};
use night_charge::io::export::export_plan_csv;
use night_charge::prices::{PriceSource, source_from_config};
use night_charge::runner::{RunError, run_once};
use night_charge::scheduler::{
    ChargeScheduler, DispatchError, JsonFileScheduler, LogScheduler, ScheduleRequest,
};

/// Scheduler that is unavailable for the first `outages` calls.
struct Unavailable {
    outages: u32,
    delivered: Vec<ScheduleRequest>,
}

impl ChargeScheduler for Unavailable {
    fn set_charging_schedule(&mut self, request: &ScheduleRequest) -> Result<(), DispatchError> {
        if self.outages > 0 {
            self.outages -= 1;
            return Err(DispatchError::Request("502 Bad Gateway".into()));
        }
        self.delivered.push(request.clone());
        Ok(())
    }
}

fn config_for(path: &std::path::Path, format: PriceFormat) -> PlannerConfig {
    let mut config = PlannerConfig::default();
    config.planner.charge_hours = 2;
    config.prices.path = path.to_path_buf();
    config.prices.format = format;
    config.scheduler.serial_number = "AL2002321010043".into();
    config.scheduler.backoff_ms = 0;
    config
}

#[test]
fn csv_prices_to_json_command_file() {
    let dir = tempfile::tempdir().unwrap();
    let prices = common::write_file(
        dir.path(),
        "prices.csv",
        &common::prices_csv(&common::scenario_day()),
    );
    let command_path = dir.path().join("command.json");

    let config = config_for(&prices, PriceFormat::Csv);
    let source = source_from_config(&config.prices);
    let mut scheduler = JsonFileScheduler::new(&command_path);

    let report = run_once(&config, &source, &mut scheduler).unwrap();
    assert!(report.plan.profitable);
    assert_eq!(report.attempts, 1);

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&command_path).unwrap()).unwrap();
    assert_eq!(written["serial_number"], "AL2002321010043");
    assert_eq!(written["battery_high_cap"], 100);
    assert_eq!(written["command"]["grid_charge"], true);
    assert_eq!(written["command"]["first"]["start"], "04:00");
    assert_eq!(written["command"]["first"]["end"], "06:00");
    assert_eq!(written["command"]["second"]["start"], "00:00");
    assert_eq!(written["command"]["second"]["end"], "00:00");
}

#[test]
fn ote_json_prices_plan_split_windows() {
    let dir = tempfile::tempdir().unwrap();
    let day = common::day_with_night([10.0, 100.0, 10.0, 100.0, 10.0, 100.0, 10.0], 80.0);
    let prices = common::write_file(dir.path(), "ote.json", &common::ote_chart_json(&day));

    let config = config_for(&prices, PriceFormat::OteJson);
    let mut scheduler = LogScheduler::new();
    let report = run_once(&config, &source_from_config(&config.prices), &mut scheduler).unwrap();

    let command = &scheduler.last().unwrap().command;
    assert!(command.grid_charge);
    assert_eq!(command.first.to_string(), "00:00-01:00");
    assert_eq!(command.second.to_string(), "02:00-03:00");
    assert_eq!(report.plan.schedule.mean_price(), 10.0);
}

#[test]
fn quarter_hour_feed_is_averaged() {
    let dir = tempfile::tempdir().unwrap();
    let quarters: Vec<f64> = common::scenario_day()
        .iter()
        .flat_map(|&p| [p - 1.0, p + 1.0, p - 2.0, p + 2.0])
        .collect();
    let prices = common::write_file(dir.path(), "q.json", &common::ote_chart_json(&quarters));

    let mut config = config_for(&prices, PriceFormat::OteJson);
    config.prices.resolution_minutes = 15;
    let hourly = source_from_config(&config.prices).hourly_prices().unwrap();
    assert_eq!(hourly, common::scenario_day());
}

#[test]
fn scheduler_outage_is_retried() {
    let config = config_for(std::path::Path::new("unused"), PriceFormat::Csv);
    let source = night_charge::prices::StaticPrices(common::scenario_day());
    let mut scheduler = Unavailable {
        outages: 2,
        delivered: Vec::new(),
    };

    let report = run_once(&config, &source, &mut scheduler).unwrap();
    assert_eq!(report.attempts, 3);
    assert_eq!(scheduler.delivered.len(), 1);
}

#[test]
fn scheduler_outage_beyond_policy_fails_run() {
    let mut config = config_for(std::path::Path::new("unused"), PriceFormat::Csv);
    config.scheduler.max_attempts = 2;
    assert_eq!(
        config.scheduler.retry_policy().delay_before(2),
        Duration::ZERO
    );
    let source = night_charge::prices::StaticPrices(common::scenario_day());
    let mut scheduler = Unavailable {
        outages: 5,
        delivered: Vec::new(),
    };

    let err = run_once(&config, &source, &mut scheduler).unwrap_err();
    assert!(matches!(
        err,
        RunError::Dispatch(DispatchError::Exhausted { attempts: 2, .. })
    ));
    assert!(scheduler.delivered.is_empty());
}

#[test]
fn missing_price_file_fails_before_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&dir.path().join("absent.csv"), PriceFormat::Csv);
    let mut scheduler = LogScheduler::new();

    let err = run_once(&config, &source_from_config(&config.prices), &mut scheduler).unwrap_err();
    assert!(matches!(err, RunError::Prices(_)));
    assert!(scheduler.last().is_none());
}

#[test]
fn short_price_file_is_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let prices = common::write_file(dir.path(), "short.csv", &common::prices_csv(&[1.0, 2.0]));
    let config = config_for(&prices, PriceFormat::Csv);
    let mut scheduler = LogScheduler::new();

    let err = run_once(&config, &source_from_config(&config.prices), &mut scheduler).unwrap_err();
    assert!(matches!(
        err,
        RunError::Plan(night_charge::plan::PlanError::InvalidInput(_))
    ));
}

#[test]
fn config_file_drives_run_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let prices = common::write_file(
        dir.path(),
        "prices.csv",
        &common::prices_csv(&common::scenario_day()),
    );
    let toml = format!(
        r#"
[planner]
charge_hours = 2
price_multiplier = 1.0

[prices]
format = "csv"
path = "{}"

[scheduler]
serial_number = "AL1"
backoff_ms = 0
"#,
        prices.display()
    );
    let config_path = common::write_file(dir.path(), "ess.toml", &toml);

    let config = PlannerConfig::from_toml_file(&config_path).unwrap();
    assert!(config.validate().is_empty());

    let mut scheduler = LogScheduler::new();
    let report = run_once(&config, &source_from_config(&config.prices), &mut scheduler).unwrap();

    let plan_path = dir.path().join("plan.csv");
    export_plan_csv(&report.plan, &plan_path).unwrap();
    let exported = fs::read_to_string(&plan_path).unwrap();
    assert_eq!(exported.lines().count(), 25);
    assert!(exported.contains("4,5.00,true,true"));
}
