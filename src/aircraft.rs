use crate::airport::AirportId;
use crate::flight::FlightRecord;
use crate::geo::Position;
use crate::time::Time;
use crate::track::Track;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

pub type AircraftId = Arc<str>;

/// Where the aircraft is along its recorded track. Written by [`Aircraft::advance`] only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlightPhase {
    Scheduled,
    InFlight,
    Landed,
    NoTrack,
}

/// Instruction asserted by airspace control for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Instruction {
    Holding,
    ClearedToLand,
}

/// Reported status, derived from phase and instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Scheduled,
    InFlight,
    Holding,
    ClearedToLand,
    Landed,
    NoTrack,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Scheduled => "Scheduled",
            Status::InFlight => "In Flight",
            Status::Holding => "Holding",
            Status::ClearedToLand => "Cleared to Land",
            Status::Landed => "Landed",
            Status::NoTrack => "No Track",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone)]
pub struct Aircraft {
    pub id: AircraftId,
    pub callsign: String,
    pub departure_airport: Option<AirportId>,
    pub arrival_airport: Option<AirportId>,
    pub departure_time: Time,
    pub arrival_time: Time,
    track: Track,
    cursor: usize,
    phase: FlightPhase,
    instruction: Option<Instruction>,
    position: Option<Position>,
    altitude: Option<f64>,
}

impl Aircraft {
    pub fn new(flight: &FlightRecord, track: Track) -> Self {
        Aircraft {
            id: flight.aircraft_id.clone(),
            callsign: flight.callsign.clone(),
            departure_airport: flight.departure_airport.clone(),
            arrival_airport: flight.arrival_airport.clone(),
            departure_time: flight.departure_time,
            arrival_time: flight.arrival_time,
            track,
            cursor: 0,
            phase: FlightPhase::Scheduled,
            instruction: None,
            position: None,
            altitude: None,
        }
    }

    /// Consumes every waypoint stamped at or before `now` and updates phase.
    ///
    /// Any instruction from the previous sweep is dropped, so airspace control
    /// has to reassert it after this call within the same tick.
    pub fn advance(&mut self, now: Time) {
        self.instruction = None;

        if self.track.is_empty() {
            self.phase = FlightPhase::NoTrack;
            return;
        }

        while let Some(wp) = self.track.get(self.cursor) {
            if wp.time > now {
                break;
            }
            self.position = Some(wp.position());
            self.altitude = Some(wp.altitude_or_zero());
            self.cursor += 1;
        }

        self.phase = if self.cursor >= self.track.len() {
            FlightPhase::Landed
        } else {
            FlightPhase::InFlight
        };
    }

    pub(crate) fn instruct(&mut self, instruction: Instruction) {
        self.instruction = Some(instruction);
    }

    pub fn status(&self) -> Status {
        match (self.phase, self.instruction) {
            (_, Some(Instruction::Holding)) => Status::Holding,
            (_, Some(Instruction::ClearedToLand)) => Status::ClearedToLand,
            (FlightPhase::Scheduled, None) => Status::Scheduled,
            (FlightPhase::InFlight, None) => Status::InFlight,
            (FlightPhase::Landed, None) => Status::Landed,
            (FlightPhase::NoTrack, None) => Status::NoTrack,
        }
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    pub fn instruction(&self) -> Option<Instruction> {
        self.instruction
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn altitude(&self) -> Option<f64> {
        self.altitude
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Callsign when known, otherwise the transponder id.
    pub fn label(&self) -> &str {
        if self.callsign.is_empty() { &*self.id } else { self.callsign.as_str() }
    }
}
