use crate::airport::Airport;
use crate::error::{Result, config_error};
use crate::time::Time;
use serde::Deserialize;

pub const DEFAULT_STEP_SECS: u64 = 10;
pub const DEFAULT_CONTROL_RADIUS_KM: f64 = 100.0;

fn default_step() -> u64 {
    DEFAULT_STEP_SECS
}

fn default_radius() -> f64 {
    DEFAULT_CONTROL_RADIUS_KM
}

/// Everything a run needs before its first tick.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimConfig {
    #[serde(default)]
    pub airport: Airport,
    pub start: Time,
    pub end: Time,
    #[serde(default = "default_step")]
    pub step_secs: u64,
    #[serde(default = "default_radius")]
    pub control_radius_km: f64,
    /// Weather seed; a fresh OS seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimConfig {
    pub fn new(airport: Airport, start: Time, end: Time) -> Self {
        SimConfig {
            airport,
            start,
            end,
            step_secs: DEFAULT_STEP_SECS,
            control_radius_km: DEFAULT_CONTROL_RADIUS_KM,
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(config_error(format!(
                "end {} is not after start {}",
                self.end, self.start
            )));
        }
        if self.step_secs == 0 {
            return Err(config_error("tick step must be at least one second"));
        }
        if !(self.control_radius_km.is_finite() && self.control_radius_km > 0.0) {
            return Err(config_error(format!(
                "control radius must be a positive number of km, got {}",
                self.control_radius_km
            )));
        }
        let (lat, lon) = (self.airport.lat, self.airport.lon);
        if !((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)) {
            return Err(config_error(format!(
                "airport {} has invalid coordinates ({}, {})",
                self.airport.id, lat, lon
            )));
        }
        Ok(())
    }

    /// Number of ticks the run will execute.
    pub fn tick_count(&self) -> u64 {
        let span = self.end.since(self.start).max(0) as u64;
        span.div_ceil(self.step_secs.max(1))
    }
}
