use crate::error::SimError;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// A UTC instant with one second resolution, stored as unix seconds.
#[derive(Debug, Clone, Copy, Ord, Eq, PartialEq, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeRepr", into = "i64")]
pub struct Time(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
pub enum TimeRepr {
    Unix(i64),
    Text(String),
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl Time {
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    /// Seconds from `earlier` to `self`, negative if `earlier` is later.
    pub fn since(self, earlier: Time) -> i64 {
        self.0 - earlier.0
    }
}

impl FromStr for Time {
    type Err = SimError;

    /// Accepts unix seconds, RFC 3339, or a naive date-time which is taken as UTC.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(secs) = s.parse::<i64>() {
            return Ok(Time(secs));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Time(dt.timestamp()));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
            .map(|naive| Time(naive.and_utc().timestamp()))
            .ok_or_else(|| SimError::Time(format!("unrecognized instant '{}'", s)))
    }
}

impl TryFrom<TimeRepr> for Time {
    type Error = SimError;

    fn try_from(repr: TimeRepr) -> Result<Self, Self::Error> {
        match repr {
            TimeRepr::Unix(secs) => Ok(Time(secs)),
            TimeRepr::Text(text) => text.parse(),
        }
    }
}

impl From<Time> for i64 {
    fn from(t: Time) -> Self {
        t.0
    }
}

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%SZ")),
            None => write!(f, "@{}", self.0),
        }
    }
}

impl Add<u64> for Time {
    type Output = Self;

    fn add(self, rhs: u64) -> Self::Output {
        Time(self.0.saturating_add_unsigned(rhs))
    }
}

impl Sub<u64> for Time {
    type Output = Self;

    fn sub(self, rhs: u64) -> Self::Output {
        Time(self.0.saturating_sub_unsigned(rhs))
    }
}

impl AddAssign<u64> for Time {
    fn add_assign(&mut self, rhs: u64) {
        *self = *self + rhs;
    }
}
