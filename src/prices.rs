//! Day-ahead price sources.
//!
//! Sources read prices that were already fetched by some external process
//! and hand the planner a clean hourly series. Network download is not part
//! of this crate.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::config::{PriceFormat, PricesSection};

/// Quarter-hours per hour for 15-minute feeds.
const QUARTERS_PER_HOUR: usize = 4;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("cannot read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed price CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("price CSV has no `price` column")]
    MissingPriceColumn,

    #[error("malformed price JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("price JSON has no price line (expected data.dataLine[1])")]
    MissingPriceLine,

    #[error("price series is empty")]
    Empty,

    #[error("price at index {index} is not a number: {value:?}")]
    NotANumber { index: usize, value: String },

    #[error("price at index {index} is not a finite number")]
    NotFinite { index: usize },

    #[error("{len} quarter-hour prices do not form whole hours")]
    PartialHour { len: usize },

    #[error("unsupported resolution of {0} minutes")]
    UnsupportedResolution(u32),
}

/// Anything that can produce an ordered hourly price series for one day.
pub trait PriceSource {
    /// Returns one price per hour, in hour order.
    fn hourly_prices(&self) -> Result<Vec<f64>, PriceError>;
}

/// In-memory price series.
#[derive(Debug, Clone)]
pub struct StaticPrices(pub Vec<f64>);

impl PriceSource for StaticPrices {
    fn hourly_prices(&self) -> Result<Vec<f64>, PriceError> {
        check_series(&self.0)?;
        Ok(self.0.clone())
    }
}

/// CSV file with a header row containing a `price` column.
#[derive(Debug, Clone)]
pub struct CsvPriceFile {
    path: PathBuf,
    resolution_minutes: u32,
}

impl CsvPriceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            resolution_minutes: 60,
        }
    }

    pub fn with_resolution(mut self, minutes: u32) -> Self {
        self.resolution_minutes = minutes;
        self
    }
}

impl PriceSource for CsvPriceFile {
    fn hourly_prices(&self) -> Result<Vec<f64>, PriceError> {
        let file = File::open(&self.path).map_err(|source| PriceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let prices = read_price_csv(file)?;
        to_hourly(&prices, self.resolution_minutes)
    }
}

/// OTE day-ahead market chart-data JSON document.
#[derive(Debug, Clone)]
pub struct OteChartFile {
    path: PathBuf,
    resolution_minutes: u32,
}

impl OteChartFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            resolution_minutes: 60,
        }
    }

    pub fn with_resolution(mut self, minutes: u32) -> Self {
        self.resolution_minutes = minutes;
        self
    }
}

impl PriceSource for OteChartFile {
    fn hourly_prices(&self) -> Result<Vec<f64>, PriceError> {
        let content = fs::read_to_string(&self.path).map_err(|source| PriceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let prices = parse_ote_chart(&content)?;
        to_hourly(&prices, self.resolution_minutes)
    }
}

/// Builds the configured price source.
pub fn source_from_config(prices: &PricesSection) -> Box<dyn PriceSource> {
    match prices.format {
        PriceFormat::Csv => Box::new(
            CsvPriceFile::new(&prices.path).with_resolution(prices.resolution_minutes),
        ),
        PriceFormat::OteJson => Box::new(
            OteChartFile::new(&prices.path).with_resolution(prices.resolution_minutes),
        ),
    }
}

impl<S: PriceSource + ?Sized> PriceSource for Box<S> {
    fn hourly_prices(&self) -> Result<Vec<f64>, PriceError> {
        (**self).hourly_prices()
    }
}

/// Reads the `price` column of a CSV document, in row order.
///
/// # Errors
///
/// Returns a `PriceError` if the CSV is malformed, lacks a `price` column, or
/// a value is not a number.
pub fn read_price_csv(reader: impl Read) -> Result<Vec<f64>, PriceError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case("price"))
        .ok_or(PriceError::MissingPriceColumn)?;

    let mut prices = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let raw = record.get(column).unwrap_or("");
        let value: f64 = raw.parse().map_err(|_| PriceError::NotANumber {
            index: prices.len(),
            value: raw.to_string(),
        })?;
        prices.push(value);
    }

    check_series(&prices)?;
    Ok(prices)
}

#[derive(Deserialize)]
struct OteChart {
    data: OteChartData,
}

#[derive(Deserialize)]
struct OteChartData {
    #[serde(rename = "dataLine")]
    data_line: Vec<OteDataLine>,
}

#[derive(Deserialize)]
struct OteDataLine {
    #[serde(default)]
    point: Vec<OtePoint>,
}

#[derive(Deserialize)]
struct OtePoint {
    y: f64,
}

/// Extracts the price line from an OTE day-ahead chart-data document.
///
/// The chart carries several data lines; the second one holds the prices
/// (the first is traded volume).
///
/// # Errors
///
/// Returns a `PriceError` if the JSON is malformed or has no price line.
pub fn parse_ote_chart(json: &str) -> Result<Vec<f64>, PriceError> {
    let chart: OteChart = serde_json::from_str(json)?;
    let line = chart
        .data
        .data_line
        .get(1)
        .ok_or(PriceError::MissingPriceLine)?;
    let prices: Vec<f64> = line.point.iter().map(|p| p.y).collect();
    check_series(&prices)?;
    Ok(prices)
}

/// Converts a series at `resolution_minutes` into hourly prices.
///
/// Hourly input is returned as is; quarter-hour input is averaged in groups
/// of four.
///
/// # Errors
///
/// Returns `PartialHour` if quarter-hour input does not divide into whole
/// hours, and `UnsupportedResolution` for anything but 60 or 15 minutes.
pub fn to_hourly(prices: &[f64], resolution_minutes: u32) -> Result<Vec<f64>, PriceError> {
    match resolution_minutes {
        60 => Ok(prices.to_vec()),
        15 => {
            if prices.len() % QUARTERS_PER_HOUR != 0 {
                return Err(PriceError::PartialHour { len: prices.len() });
            }
            Ok(prices
                .chunks_exact(QUARTERS_PER_HOUR)
                .map(|q| q.iter().sum::<f64>() / QUARTERS_PER_HOUR as f64)
                .collect())
        }
        other => Err(PriceError::UnsupportedResolution(other)),
    }
}

fn check_series(prices: &[f64]) -> Result<(), PriceError> {
    if prices.is_empty() {
        return Err(PriceError::Empty);
    }
    if let Some(index) = prices.iter().position(|p| !p.is_finite()) {
        return Err(PriceError::NotFinite { index });
    }
    Ok(())
}
