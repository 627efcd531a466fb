//! Downstream battery scheduler and retry policy.
//!
//! The planner only produces a [`ChargeCommand`]. Getting it onto the
//! battery is the job of a [`ChargeScheduler`], which owns authentication
//! and persistence. [`dispatch_with_retry`] wraps any scheduler with an
//! explicit [`RetryPolicy`].

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::plan::ChargeCommand;

/// Payload sent to the battery service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRequest {
    /// Serial number of the battery system.
    pub serial_number: String,
    /// Charge ceiling in percent of capacity.
    pub battery_high_cap: u8,
    pub command: ChargeCommand,
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("authentication failed, check the scheduler credentials")]
    Unauthorized,

    #[error("scheduler request failed: {0}")]
    Request(String),

    #[error("cannot write schedule: {0}")]
    Io(#[from] io::Error),

    #[error("cannot serialize schedule: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to set charging schedule after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<DispatchError>,
    },
}

/// A service that accepts charging instructions for one battery.
pub trait ChargeScheduler {
    /// Sends one request. Implementations do not retry on their own.
    fn set_charging_schedule(&mut self, request: &ScheduleRequest) -> Result<(), DispatchError>;
}

impl<S: ChargeScheduler + ?Sized> ChargeScheduler for Box<S> {
    fn set_charging_schedule(&mut self, request: &ScheduleRequest) -> Result<(), DispatchError> {
        (**self).set_charging_schedule(request)
    }
}

/// How often and how patiently to call a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first (>= 1).
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for each further retry.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Delay to wait before `attempt` (1-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let factor = 1_u32.checked_shl(attempt - 2).unwrap_or(u32::MAX);
        self.backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Sends `request` through `scheduler`, retrying per `policy`.
///
/// Returns the number of attempts used on success. `Unauthorized` is not
/// retried.
///
/// # Errors
///
/// Returns `DispatchError::Exhausted` wrapping the last failure once all
/// attempts are used up, or immediately after an `Unauthorized` response.
pub fn dispatch_with_retry<S: ChargeScheduler + ?Sized>(
    scheduler: &mut S,
    request: &ScheduleRequest,
    policy: &RetryPolicy,
) -> Result<u32, DispatchError> {
    let mut attempt = 1;
    loop {
        let delay = policy.delay_before(attempt);
        if !delay.is_zero() {
            thread::sleep(delay);
        }

        match scheduler.set_charging_schedule(request) {
            Ok(()) => {
                info!(attempt, "Successfully sent charging schedule to ESS");
                return Ok(attempt);
            }
            Err(e) => {
                let fatal = matches!(e, DispatchError::Unauthorized);
                if fatal || attempt >= policy.max_attempts {
                    error!(attempt, "Failed to set charging schedule: {e}");
                    return Err(DispatchError::Exhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                warn!(attempt, "Attempt failed, retrying: {e}");
            }
        }
        attempt += 1;
    }
}

/// Dry-run scheduler: logs the request and keeps the last one in memory.
#[derive(Debug, Default)]
pub struct LogScheduler {
    last: Option<ScheduleRequest>,
}

impl LogScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent request received.
    pub fn last(&self) -> Option<&ScheduleRequest> {
        self.last.as_ref()
    }
}

impl ChargeScheduler for LogScheduler {
    fn set_charging_schedule(&mut self, request: &ScheduleRequest) -> Result<(), DispatchError> {
        info!(
            serial = %request.serial_number,
            high_cap = request.battery_high_cap,
            "dry run, not sending: {}",
            request.command
        );
        self.last = Some(request.clone());
        Ok(())
    }
}

/// Writes each request as pretty-printed JSON, replacing the file.
///
/// An external agent picks the file up and talks to the battery service.
#[derive(Debug, Clone)]
pub struct JsonFileScheduler {
    path: PathBuf,
}

impl JsonFileScheduler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChargeScheduler for JsonFileScheduler {
    fn set_charging_schedule(&mut self, request: &ScheduleRequest) -> Result<(), DispatchError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, request)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
