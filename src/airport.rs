use crate::geo::{Bounds, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;

pub type AirportId = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    pub id: AirportId,
    pub lat: f64,
    pub lon: f64,
}

impl Airport {
    pub fn new(id: &str, lat: f64, lon: f64) -> Self {
        Airport { id: Arc::from(id), lat, lon }
    }

    pub fn location(&self) -> Position {
        Position::new(self.lat, self.lon)
    }

    /// Lat/lon box enclosing the control area.
    pub fn bounds(&self, radius_km: f64) -> Bounds {
        Bounds::around(self.location(), radius_km)
    }
}

impl Default for Airport {
    fn default() -> Self {
        Airport::new("KLAX", 33.942791, -118.410042)
    }
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4}, {:.4})", self.id, self.lat, self.lon)
    }
}
