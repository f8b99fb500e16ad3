use crate::aircraft::Aircraft;
use crate::airport::Airport;
use crate::config::SimConfig;
use crate::flight::FlightRecord;
use crate::geo::EARTH_RADIUS_KM;
use crate::time::Time;
use crate::track::{Track, Waypoint};
use proptest::prelude::Strategy;
use std::f64::consts::PI;
use std::sync::Arc;

pub const T0: i64 = 1_740_837_600;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

/// Latitude of a point `km` north of the equator.
pub fn km_north(km: f64) -> f64 {
    km / (EARTH_RADIUS_KM * PI / 180.0)
}

/// Airport at (0, 0) with a 50 km control radius and a fixed weather seed.
pub fn config(end_offset: i64, step_secs: u64) -> SimConfig {
    let mut config = SimConfig::new(Airport::new("TEST", 0.0, 0.0), Time(T0), Time(T0 + end_offset));
    config.step_secs = step_secs;
    config.control_radius_km = 50.0;
    config.seed = Some(7);
    config
}

pub fn waypoint(offset: i64, lat: f64, lon: f64, altitude: Option<f64>) -> Waypoint {
    Waypoint {
        time: Time(T0 + offset),
        lat,
        lon,
        altitude,
        heading: Some(180.0),
        on_ground: false,
    }
}

pub fn add_aircraft(roster: &mut Vec<Aircraft>, aircraft_id: &str, waypoints: Vec<Waypoint>) {
    let flight = FlightRecord {
        aircraft_id: id(aircraft_id),
        callsign: aircraft_id.to_uppercase(),
        departure_airport: Some(id("ORIG")),
        arrival_airport: Some(id("TEST")),
        departure_time: Time(T0 - 3600),
        arrival_time: Time(T0 + 3600),
    };
    roster.push(Aircraft::new(&flight, Track::new(None, None, waypoints)));
}

/// Straight descent towards the airport from `from_km` north, one sample a minute.
pub fn approach(from_km: f64, minutes: i64) -> Vec<Waypoint> {
    (0..=minutes)
        .map(|m| {
            let km = from_km * (1.0 - m as f64 / minutes as f64);
            waypoint(m * 60, km_north(km), 0.0, Some(3000.0 * km / from_km))
        })
        .collect()
}

pub fn arb_track() -> impl Strategy<Value = Vec<Waypoint>> {
    proptest::collection::vec((0..900i64, 0.0..120.0f64), 0..20).prop_map(|mut raw| {
        raw.sort_by_key(|(t, _)| *t);
        raw.into_iter()
            .map(|(t, km)| waypoint(t, km_north(km), 0.0, Some(1000.0)))
            .collect()
    })
}
