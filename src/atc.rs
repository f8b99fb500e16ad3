use crate::aircraft::{Aircraft, AircraftId, FlightPhase, Instruction, Status};
use crate::airport::Airport;
use crate::error::{Result, config_error};
use crate::geo::{Position, distance_km, to_grid_cell};
use crate::weather::Conditions;
use std::collections::VecDeque;
use tracing::debug;

pub struct AirspaceControl {
    pub airport: Airport,
    pub control_radius_km: f64,
    to_direct: VecDeque<AircraftId>,
}

impl AirspaceControl {
    pub fn new(airport: Airport, control_radius_km: f64) -> Result<Self> {
        if !(control_radius_km.is_finite() && control_radius_km > 0.0) {
            return Err(config_error(format!(
                "control radius must be a positive number of km, got {}",
                control_radius_km
            )));
        }
        Ok(AirspaceControl {
            airport,
            control_radius_km,
            to_direct: VecDeque::new(),
        })
    }

    /// NaN coordinates compare false and so are never inside.
    pub fn in_control_area(&self, position: Position) -> bool {
        distance_km(position, self.airport.location()) <= self.control_radius_km
    }

    /// Rebuilds the work queue from every positioned aircraft inside the radius
    /// and issues instructions to them. Must run after all aircraft advanced
    /// for the tick, since advancing drops the previous instruction.
    pub fn sweep(&mut self, aircraft: &mut [Aircraft], weather: Option<&Conditions>) -> usize {
        self.to_direct.clear();
        for ac in aircraft.iter_mut() {
            let Some(position) = ac.position() else {
                continue;
            };
            if !self.in_control_area(position) {
                continue;
            }
            self.to_direct.push_back(ac.id.clone());
            Self::issue_instruction(ac, weather);
            debug!(aircraft = %ac.id, callsign = %ac.callsign, status = %ac.status(), "in control area");
        }
        self.to_direct.len()
    }

    fn issue_instruction(ac: &mut Aircraft, weather: Option<&Conditions>) {
        // landed and parked aircraft keep their phase
        if ac.phase() != FlightPhase::InFlight {
            return;
        }
        if weather.is_some_and(Conditions::requires_holding) {
            ac.instruct(Instruction::Holding);
        } else if ac.status() == Status::InFlight {
            ac.instruct(Instruction::ClearedToLand);
        }
    }

    /// Aircraft found inside the radius by the last sweep, in roster order.
    pub fn in_area(&self) -> impl Iterator<Item = &AircraftId> {
        self.to_direct.iter()
    }

    /// Grid cells of the aircraft inside the control area, over a
    /// `width` x `height` grid spanning the box around the radius.
    pub fn grid(&self, aircraft: &[Aircraft], width: usize, height: usize) -> Vec<(AircraftId, (usize, usize))> {
        let bounds = self.airport.bounds(self.control_radius_km);
        aircraft
            .iter()
            .filter_map(|ac| ac.position().map(|p| (ac, p)))
            .filter(|(_, p)| self.in_control_area(*p))
            .map(|(ac, p)| (ac.id.clone(), to_grid_cell(p.lon, p.lat, &bounds, width, height)))
            .collect()
    }
}
