use crate::aircraft::{Aircraft, AircraftId};
use crate::config::SimConfig;
use crate::error::{Result, SimError, input_error};
use crate::flight::{Direction, FlightRecord};
use crate::track::{Track, TrackRecord};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

/// Flights, tracks and run configuration as recorded by the data source.
///
/// Tracks are kept as raw JSON so one broken record only costs its own
/// aircraft, not the whole scenario.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub config: SimConfig,
    #[serde(default)]
    pub flights: Vec<FlightRecord>,
    #[serde(default)]
    pub tracks: HashMap<AircraftId, serde_json::Value>,
}

impl Scenario {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn track_for(&self, flight: &FlightRecord) -> Result<Track> {
        let id = &flight.aircraft_id;
        let raw = self
            .tracks
            .get(id)
            .ok_or_else(|| input_error(id, "no track found"))?;
        let record = TrackRecord::deserialize(raw).map_err(|e| input_error(id, e))?;
        record.into_track(id)
    }

    /// Builds the roster in record order. Aircraft whose track is missing or
    /// malformed get an empty track, a repeated aircraft id is skipped.
    pub fn aircraft(&self, direction: Direction) -> Vec<Aircraft> {
        let airport = &self.config.airport.id;
        let mut seen = HashSet::new();
        let roster: Vec<Aircraft> = self
            .flights
            .iter()
            .filter(|f| direction.matches(f, airport))
            .filter(|f| {
                let fresh = seen.insert(f.aircraft_id.clone());
                if !fresh {
                    warn!(aircraft = %f.aircraft_id, "duplicate flight record skipped");
                }
                fresh
            })
            .map(|f| {
                let track = self.track_for(f).unwrap_or_else(|e: SimError| {
                    warn!(aircraft = %f.aircraft_id, "{}", e);
                    Track::empty()
                });
                Aircraft::new(f, track)
            })
            .collect();

        info!("Found {} {:?} flights for {}", roster.len(), direction, airport);
        roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aircraft::Status;
    use crate::time::Time;

    const SCENARIO: &str = r#"{
        "config": {
            "airport": {"id": "KLAX", "lat": 33.942791, "lon": -118.410042},
            "start": "2025-03-01 14:00",
            "end": "2025-03-01 14:30",
            "step_secs": 60,
            "control_radius_km": 100,
            "seed": 7
        },
        "flights": [
            {"icao24": "aaa111", "callsign": "AAL1  ", "estDepartureAirport": "KSFO",
             "estArrivalAirport": "KLAX", "firstSeen": 1740834000, "lastSeen": 1740838800},
            {"icao24": "bbb222", "callsign": "SWA2", "estDepartureAirport": "KLAX",
             "estArrivalAirport": "KPHX", "firstSeen": 1740837000, "lastSeen": 1740841000},
            {"icao24": "ccc333", "callsign": "DAL3", "estDepartureAirport": "KSEA",
             "estArrivalAirport": "KLAX", "firstSeen": 1740830000, "lastSeen": 1740838000},
            {"icao24": "ddd444", "callsign": "UAL4", "estDepartureAirport": "KDEN",
             "estArrivalAirport": "KLAX", "firstSeen": 1740830000, "lastSeen": 1740838000},
            {"icao24": "aaa111", "callsign": "AAL1", "estDepartureAirport": "KSFO",
             "estArrivalAirport": "KLAX", "firstSeen": 1740840000, "lastSeen": 1740843000}
        ],
        "tracks": {
            "aaa111": {"startTime": 1740834000, "endTime": 1740838800, "path": [
                [1740837600, 34.5, -118.9, 3000.0, 140.0, false],
                [1740838200, 34.0, -118.5, 300.0, 145.0, false]
            ]},
            "bbb222": {"startTime": 1740837000, "endTime": 1740841000, "path": []},
            "ccc333": {"startTime": 1740830000, "path": "not a path"}
        }
    }"#;

    fn scenario() -> Scenario {
        serde_json::from_str(SCENARIO).unwrap()
    }

    #[test]
    fn test_config_section() {
        let s = scenario();
        assert_eq!(Time(1_740_837_600), s.config.start);
        assert_eq!(60, s.config.step_secs);
        assert_eq!(Some(7), s.config.seed);
        assert!(s.config.validate().is_ok());
    }

    #[test]
    fn test_arrivals_roster() {
        let roster = scenario().aircraft(Direction::Arrival);
        let ids: Vec<&str> = roster.iter().map(|a| &*a.id).collect();
        assert_eq!(vec!["aaa111", "ccc333", "ddd444"], ids);
        assert_eq!("AAL1", roster[0].callsign);
        assert_eq!(2, roster[0].track().len());
    }

    #[test]
    fn test_bad_tracks_become_empty() {
        let mut roster = scenario().aircraft(Direction::Arrival);
        // ccc333 is malformed, ddd444 has no track at all
        assert!(roster[1].track().is_empty());
        assert!(roster[2].track().is_empty());

        for ac in roster.iter_mut() {
            ac.advance(Time(1_740_837_600));
        }
        assert_eq!(Status::InFlight, roster[0].status());
        assert_eq!(Status::NoTrack, roster[1].status());
        assert_eq!(Status::NoTrack, roster[2].status());
    }

    #[test]
    fn test_departures_and_all() {
        let s = scenario();
        assert_eq!(1, s.aircraft(Direction::Departure).len());
        assert_eq!(4, s.aircraft(Direction::All).len());
    }

    #[test]
    fn test_bundled_lax_scenario_runs() {
        use crate::simulation::simulation::Simulation;

        let s = Scenario::load_from_file(concat!(env!("CARGO_MANIFEST_DIR"), "/data/lax.json")).unwrap();
        let roster = s.aircraft(Direction::Arrival);
        assert_eq!(5, roster.len());

        let mut sim = Simulation::new(s.config, roster).unwrap();
        let summary = sim.run();
        assert_eq!(180, summary.ticks);
        assert!(summary.statuses.contains(&(Status::NoTrack, 1)));
        assert!(summary.statuses.iter().any(|(status, _)| *status == Status::Landed));
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load_from_file("does/not/exist.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
