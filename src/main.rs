//! night-charge entry point: CLI wiring, config loading and one planning run.

use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use night_charge::cli::Cli;
use night_charge::config::PlannerConfig;
use night_charge::io::export::export_plan_csv;
use night_charge::prices::source_from_config;
use night_charge::runner::{RunReport, run_once};
use night_charge::scheduler::{ChargeScheduler, JsonFileScheduler, LogScheduler};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("night_charge=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> PlannerConfig {
    let mut config = match &cli.config {
        Some(path) => match PlannerConfig::from_toml_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("{e}");
                process::exit(1);
            }
        },
        None => PlannerConfig::default(),
    };

    cli.apply_overrides(&mut config);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            error!("{e}");
        }
        process::exit(1);
    }

    config
}

fn print_report(report: &RunReport) {
    let plan = &report.plan;
    println!("Cheapest night windows: {}", plan.schedule);
    println!("Daily average price:    {:.1}", plan.daily_average);
    println!("Profitable:             {}", plan.profitable);
    println!("Command:                {}", plan.command);
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli);

    let source = source_from_config(&config.prices);
    let mut scheduler: Box<dyn ChargeScheduler> = match &config.scheduler.command_out {
        Some(path) => Box::new(JsonFileScheduler::new(path)),
        None => Box::new(LogScheduler::new()),
    };

    info!(
        prices = %config.prices.path.display(),
        charge_hours = config.planner.charge_hours,
        price_multiplier = config.planner.price_multiplier,
        "Planning charging schedule"
    );

    let report = match run_once(&config, &source, &mut scheduler) {
        Ok(report) => report,
        Err(e) => {
            error!("{e}");
            process::exit(1);
        }
    };

    print_report(&report);

    if let Some(path) = &cli.plan_out {
        if let Err(e) = export_plan_csv(&report.plan, path) {
            error!("failed to write plan CSV: {e}");
            process::exit(1);
        }
        info!("Plan written to {}", path.display());
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(night_charge::api::AppState { plan: report.plan });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            error!("failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(night_charge::api::serve(state, addr)) {
            error!("API server failed: {e}");
            process::exit(1);
        }
    }
}
