use crate::aircraft::Aircraft;
use crate::atc::AirspaceControl;
use crate::config::SimConfig;
use crate::error::Result;
use crate::report::{AircraftReport, RunSummary, TickReport};
use crate::time::Time;
use crate::weather::Weather;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

/// Cooperative stop flag, honoured between ticks.
#[derive(Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

pub struct Simulation {
    config: SimConfig,
    clock: Time,
    ticks: u64,
    aircraft: Vec<Aircraft>,
    weather: Weather,
    control: AirspaceControl,
    rng: StdRng,
    stop: StopHandle,
    last_report: Option<TickReport>,
}

impl Simulation {
    /// Validates `config` and takes ownership of the roster. Aircraft are
    /// advanced in the order given here for the whole run.
    pub fn new(config: SimConfig, aircraft: Vec<Aircraft>) -> Result<Simulation> {
        config.validate()?;
        let control = AirspaceControl::new(config.airport.clone(), config.control_radius_km)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        info!(
            airport = %config.airport,
            start = %config.start,
            end = %config.end,
            step_secs = config.step_secs,
            radius_km = config.control_radius_km,
            aircraft = aircraft.len(),
            "simulation ready"
        );
        Ok(Simulation {
            clock: config.start,
            config,
            ticks: 0,
            aircraft,
            weather: Weather::new(),
            control,
            rng,
            stop: StopHandle::default(),
            last_report: None,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.clock >= self.config.end
    }

    /// Runs one tick at the current clock: weather, then every aircraft in
    /// roster order, then the control sweep. Returns `None` once finished.
    pub fn tick(&mut self) -> Option<&TickReport> {
        if self.is_finished() {
            return None;
        }
        let now = self.clock;

        self.weather.resample(&mut self.rng);
        for ac in self.aircraft.iter_mut() {
            ac.advance(now);
        }
        // advance clears last tick's instructions, so this has to come after it
        let in_area = self.control.sweep(&mut self.aircraft, self.weather.current());

        let report = self.capture(now);
        info!(
            tick = report.tick,
            time = %now,
            in_area,
            weather = %report.weather.as_ref().map(|w| w.to_string()).unwrap_or_default(),
            "tick"
        );
        for ac in &report.aircraft {
            debug!(
                aircraft = %ac.id,
                callsign = %ac.callsign,
                status = %ac.status,
                position = ?ac.position,
                altitude = ?ac.altitude,
                "aircraft"
            );
        }

        self.ticks += 1;
        self.clock += self.config.step_secs;
        self.last_report = Some(report);
        self.last_report.as_ref()
    }

    fn capture(&self, now: Time) -> TickReport {
        let airport = self.config.airport.location();
        TickReport {
            tick: self.ticks,
            time: now,
            weather: self.weather.current().cloned(),
            in_area: self.control.in_area().cloned().collect(),
            aircraft: self
                .aircraft
                .iter()
                .map(|ac| AircraftReport::new(ac, airport))
                .collect(),
        }
    }

    pub fn run(&mut self) -> RunSummary {
        self.run_with(|_| {})
    }

    /// Ticks until the end of the window or until a stop is requested.
    /// `on_tick` sees each report between ticks. A honoured stop request is
    /// consumed so a later call resumes from the current clock.
    pub fn run_with<F: FnMut(&TickReport)>(&mut self, mut on_tick: F) -> RunSummary {
        let mut stopped = false;
        while !self.is_finished() {
            if self.stop.take() {
                info!(time = %self.clock, "stop requested");
                stopped = true;
                break;
            }
            if let Some(report) = self.tick() {
                on_tick(report);
            }
        }
        self.summary(stopped)
    }

    pub fn summary(&self, stopped: bool) -> RunSummary {
        RunSummary::new(self.ticks, self.clock, stopped, &self.aircraft)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn clock(&self) -> Time {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn control(&self) -> &AirspaceControl {
        &self.control
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    /// Report of the current state, also before the first tick.
    pub fn snapshot(&self) -> TickReport {
        match &self.last_report {
            Some(report) => report.clone(),
            None => self.capture(self.clock),
        }
    }
}
