// src/config/model.rs

use std::time::Duration;

use crate::config::parse::ConfigError;

/// One labeled unit of work for the run phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSuite {
    /// Unique name used in the report and in per-suite artifact names.
    pub label: String,
    /// Executable command to run remotely, opaque to this crate.
    pub executable: String,
}

/// SMTP settings parsed from the email settings file.
///
/// Transport itself lives behind the `Notifier` seam; these fields are
/// validated here so a malformed file fails before any command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
}

/// Wall-clock budget for one phase, in minutes (fractional allowed).
///
/// Strictly positive by construction: zero, negative, or non-finite values
/// are rejected before any remote resource is touched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseTimeout {
    minutes: f64,
}

impl PhaseTimeout {
    pub fn from_minutes(minutes: f64) -> Result<Self, ConfigError> {
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(ConfigError::InvalidTimeout { minutes });
        }
        Ok(Self { minutes })
    }

    pub fn minutes(&self) -> f64 {
        self.minutes
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.minutes * 60.0)
    }
}

/// Largest spot bid accepted without the explicit override flag.
pub const MAX_SPOT_BID: f64 = 10.0;

/// Maximum bid in USD for spot instances, strictly positive by construction.
///
/// Bids above [`MAX_SPOT_BID`] are rejected unless the caller explicitly
/// suppresses the sanity check; a mistyped bid on a nightly run could
/// otherwise get expensive before anyone notices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotBid {
    dollars: f64,
}

impl SpotBid {
    pub fn from_dollars(dollars: f64, suppress_sanity_check: bool) -> Result<Self, ConfigError> {
        if !dollars.is_finite() || dollars <= 0.0 {
            return Err(ConfigError::InvalidSpotBid { dollars });
        }
        if !suppress_sanity_check && dollars > MAX_SPOT_BID {
            return Err(ConfigError::SpotBidTooHigh { dollars });
        }
        Ok(Self { dollars })
    }

    pub fn dollars(&self) -> f64 {
        self.dollars
    }
}
