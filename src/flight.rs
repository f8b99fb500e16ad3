use crate::airport::AirportId;
use crate::time::Time;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;

/// Schedule entry for one flight as delivered by the data source.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightRecord {
    #[serde(alias = "icao24")]
    pub aircraft_id: Arc<str>,
    #[serde(default, deserialize_with = "trimmed")]
    pub callsign: String,
    #[serde(alias = "estDepartureAirport")]
    pub departure_airport: Option<AirportId>,
    #[serde(alias = "estArrivalAirport")]
    pub arrival_airport: Option<AirportId>,
    #[serde(alias = "firstSeen")]
    pub departure_time: Time,
    #[serde(alias = "lastSeen")]
    pub arrival_time: Time,
}

fn trimmed<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.map(|s| s.trim().to_string()).unwrap_or_default())
}

/// Which flights of the airport take part in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Arrival,
    Departure,
    All,
}

impl Direction {
    pub fn matches(&self, flight: &FlightRecord, airport: &str) -> bool {
        let arrives = flight.arrival_airport.as_deref() == Some(airport);
        let departs = flight.departure_airport.as_deref() == Some(airport);
        match self {
            Direction::Arrival => arrives,
            Direction::Departure => departs,
            Direction::All => arrives || departs,
        }
    }
}
