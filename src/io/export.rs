//! CSV export for daily charging plans.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::runner::DayPlan;

/// Column header for the hourly plan export.
const HEADER: &str = "hour,price,night,charging";

/// Exports the hourly plan to a CSV file at the given path.
///
/// Writes a header row followed by one row per hour of the price series.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_plan_csv(plan: &DayPlan, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_plan_csv(plan, buf)
}

/// Writes the hourly plan as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_plan_csv(plan: &DayPlan, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for h in plan.hours() {
        wtr.write_record(&[
            h.hour.to_string(),
            format!("{:.2}", h.price),
            h.night.to_string(),
            h.charging.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
