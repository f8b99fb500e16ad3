use crate::aircraft::{Aircraft, AircraftId, Status};
use crate::geo::{Position, distance_km};
use crate::time::Time;
use crate::weather::Conditions;
use colored::{ColoredString, Colorize};
use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// What an observer sees of one aircraft between ticks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AircraftReport {
    pub id: AircraftId,
    pub callsign: String,
    pub status: Status,
    pub position: Option<Position>,
    pub altitude: Option<f64>,
    pub distance_km: Option<f64>,
}

impl AircraftReport {
    pub fn new(ac: &Aircraft, airport: Position) -> Self {
        AircraftReport {
            id: ac.id.clone(),
            callsign: ac.label().to_string(),
            status: ac.status(),
            position: ac.position(),
            altitude: ac.altitude(),
            distance_km: ac.position().map(|p| distance_km(p, airport)),
        }
    }
}

/// Consistent picture of the whole simulation taken at the end of a tick.
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: u64,
    pub time: Time,
    pub weather: Option<Conditions>,
    pub in_area: Vec<AircraftId>,
    pub aircraft: Vec<AircraftReport>,
}

impl TickReport {
    pub fn count(&self, status: Status) -> usize {
        self.aircraft.iter().filter(|a| a.status == status).count()
    }
}

#[derive(Tabled)]
pub struct AircraftRow {
    #[tabled(rename = "Aircraft")]
    pub id: AircraftId,
    #[tabled(rename = "Callsign")]
    pub callsign: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Position")]
    pub position: String,
    #[tabled(rename = "Altitude (m)")]
    pub altitude: String,
    #[tabled(rename = "Distance (km)")]
    pub distance: String,
}

impl From<&AircraftReport> for AircraftRow {
    fn from(r: &AircraftReport) -> Self {
        AircraftRow {
            id: r.id.clone(),
            callsign: r.callsign.clone(),
            status: colorize(r.status).to_string(),
            position: r.position.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
            altitude: r.altitude.map(|a| format!("{:.0}", a)).unwrap_or_else(|| "-".to_string()),
            distance: r.distance_km.map(|d| format!("{:.1}", d)).unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub fn colorize(status: Status) -> ColoredString {
    let text = status.to_string();
    let text = text.as_str();
    match status {
        Status::Scheduled => text.dimmed(),
        Status::InFlight => text.cyan(),
        Status::Holding => text.yellow().bold(),
        Status::ClearedToLand => text.green().bold(),
        Status::Landed => text.green(),
        Status::NoTrack => text.red(),
    }
}

const STATUS_ORDER: [Status; 6] = [
    Status::Scheduled,
    Status::InFlight,
    Status::Holding,
    Status::ClearedToLand,
    Status::Landed,
    Status::NoTrack,
];

/// Outcome of a (possibly interrupted) run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub clock: Time,
    pub stopped: bool,
    pub statuses: Vec<(Status, usize)>,
}

impl RunSummary {
    pub fn new(ticks: u64, clock: Time, stopped: bool, aircraft: &[Aircraft]) -> Self {
        let statuses = STATUS_ORDER
            .iter()
            .map(|s| (*s, aircraft.iter().filter(|a| a.status() == *s).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        RunSummary { ticks, clock, stopped, statuses }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.stopped { "stopped" } else { "finished" };
        write!(f, "Simulation {} after {} ticks at {}", verb, self.ticks, self.clock)?;
        for (status, n) in &self.statuses {
            write!(f, "\n  {:<16} {}", status.to_string(), n)?;
        }
        Ok(())
    }
}
