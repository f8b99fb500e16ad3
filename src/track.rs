use crate::error::{Result, input_error};
use crate::geo::Position;
use crate::time::Time;
use serde::{Deserialize, Serialize};

/// One recorded position sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub time: Time,
    pub lat: f64,
    pub lon: f64,
    pub altitude: Option<f64>,
    pub heading: Option<f64>,
    pub on_ground: bool,
}

impl Waypoint {
    pub fn position(&self) -> Position {
        Position::new(self.lat, self.lon)
    }

    /// Missing altitude reads as ground level.
    pub fn altitude_or_zero(&self) -> f64 {
        self.altitude.unwrap_or(0.0)
    }
}

/// Time ordered waypoints for a single flight. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub start: Option<Time>,
    pub end: Option<Time>,
    waypoints: Vec<Waypoint>,
}

impl Track {
    pub fn new(start: Option<Time>, end: Option<Time>, waypoints: Vec<Waypoint>) -> Self {
        Track { start, end, waypoints }
    }

    pub fn empty() -> Self {
        Track::default()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Waypoint> {
        self.waypoints.get(idx)
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }
}

/// Raw path entry: `[time, lat, lon, altitude, heading, on_ground]`.
pub type PathEntry = (Time, f64, f64, Option<f64>, Option<f64>, bool);

/// Track as delivered by the data source.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRecord {
    #[serde(alias = "startTime")]
    pub start_time: Option<Time>,
    #[serde(alias = "endTime")]
    pub end_time: Option<Time>,
    #[serde(default)]
    pub path: Vec<PathEntry>,
}

impl TrackRecord {
    /// Converts into a [`Track`], rejecting paths that go back in time.
    pub fn into_track(self, aircraft_id: &str) -> Result<Track> {
        if let Some(pair) = self.path.windows(2).find(|pair| pair[1].0 < pair[0].0) {
            return Err(input_error(
                aircraft_id,
                format!("path is not time ordered ({} after {})", pair[1].0, pair[0].0),
            ));
        }
        let waypoints = self
            .path
            .into_iter()
            .map(|(time, lat, lon, altitude, heading, on_ground)| Waypoint {
                time,
                lat,
                lon,
                altitude,
                heading,
                on_ground,
            })
            .collect();
        Ok(Track::new(self.start_time, self.end_time, waypoints))
    }
}
