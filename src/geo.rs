use serde::{Deserialize, Serialize};

/// Mean earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of one degree of latitude.
pub const KM_PER_DEG_LAT: f64 = 111.11;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub lat: f64,
    pub lon: f64,
}

impl Position {
    pub fn new(lat: f64, lon: f64) -> Self {
        Position { lat, lon }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lon)
    }
}

/// Haversine distance in km. NaN in, NaN out.
pub fn distance_km(a: Position, b: Position) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Lat/lon box around a center point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Box that encloses a circle of `radius_km` around `center`.
    pub fn around(center: Position, radius_km: f64) -> Self {
        let dlat = radius_km / KM_PER_DEG_LAT;
        let dlon = radius_km / (KM_PER_DEG_LAT * center.lat.to_radians().cos());
        Bounds {
            min_lat: center.lat - dlat,
            max_lat: center.lat + dlat,
            min_lon: center.lon - dlon,
            max_lon: center.lon + dlon,
        }
    }
}

/// Maps a coordinate onto a `width` x `height` grid spanning `bounds`.
/// Out-of-box coordinates land on the nearest edge cell, NaN lands on 0.
pub fn to_grid_cell(lon: f64, lat: f64, bounds: &Bounds, width: usize, height: usize) -> (usize, usize) {
    let x = (lon - bounds.min_lon) / (bounds.max_lon - bounds.min_lon) * width as f64;
    let y = (lat - bounds.min_lat) / (bounds.max_lat - bounds.min_lat) * height as f64;
    (clamp_cell(x, width), clamp_cell(y, height))
}

fn clamp_cell(v: f64, size: usize) -> usize {
    let max = size.saturating_sub(1);
    // float to int casts saturate and map NaN to 0
    (v.floor().max(0.0) as usize).min(max)
}
