use rand::Rng;
use rand::seq::IndexedRandom;
use rand_distr::{Distribution, StandardNormal};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Visibility {
    Clear,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Precipitation {
    None,
    Light,
    Storm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Clouds {
    Clear,
    PartlyCloudy,
    Overcast,
}

const VISIBILITY: [(Visibility, u32); 3] = [
    (Visibility::Clear, 70),
    (Visibility::Moderate, 20),
    (Visibility::Low, 10),
];

const PRECIPITATION: [(Precipitation, u32); 3] = [
    (Precipitation::None, 85),
    (Precipitation::Light, 10),
    (Precipitation::Storm, 5),
];

const CLOUDS: [(Clouds, u32); 3] = [
    (Clouds::Clear, 60),
    (Clouds::PartlyCloudy, 30),
    (Clouds::Overcast, 10),
];

const WIND_MEAN: f64 = 10.0;
const WIND_STDEV: f64 = 5.0;
const TEMPERATURE_MEAN: f64 = 20.0;
const TEMPERATURE_STDEV: f64 = 5.0;

/// One weather snapshot. Wind in knots, temperature in °C.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conditions {
    pub visibility: Visibility,
    pub wind_speed: f64,
    pub precipitation: Precipitation,
    pub temperature: f64,
    pub clouds: Clouds,
}

impl Conditions {
    /// Low visibility or a storm keeps arrivals out of the approach.
    pub fn requires_holding(&self) -> bool {
        self.visibility == Visibility::Low || self.precipitation == Precipitation::Storm
    }
}

impl fmt::Display for Conditions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "visibility {:?}, wind {:.1}kt, precipitation {:?}, {:.1}°C, clouds {:?}",
            self.visibility, self.wind_speed, self.precipitation, self.temperature, self.clouds
        )
    }
}

/// Process wide weather. Holds nothing until the first [`Weather::resample`].
#[derive(Debug, Default)]
pub struct Weather {
    current: Option<Conditions>,
}

impl Weather {
    pub fn new() -> Self {
        Weather::default()
    }

    /// Draws a fresh snapshot and swaps it in whole.
    pub fn resample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &Conditions {
        let next = Conditions {
            visibility: pick(rng, &VISIBILITY),
            wind_speed: round1(gaussian(rng, WIND_MEAN, WIND_STDEV).max(0.0)),
            precipitation: pick(rng, &PRECIPITATION),
            temperature: round1(gaussian(rng, TEMPERATURE_MEAN, TEMPERATURE_STDEV)),
            clouds: pick(rng, &CLOUDS),
        };
        self.current.insert(next)
    }

    pub fn current(&self) -> Option<&Conditions> {
        self.current.as_ref()
    }
}

fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[(T, u32)]) -> T {
    table
        .choose_weighted(rng, |(_, weight)| *weight)
        .map(|(value, _)| *value)
        .unwrap_or(table[0].0)
}

fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, stdev: f64) -> f64 {
    let z: f64 = StandardNormal.sample(rng);
    mean + stdev * z
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_empty_before_first_resample() {
        let weather = Weather::new();
        assert!(weather.current().is_none());
    }

    #[test]
    fn test_seeded_source_is_reproducible() {
        let mut a = Weather::new();
        let mut b = Weather::new();
        let mut rng_a = StdRng::seed_from_u64(7);
        let mut rng_b = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            a.resample(&mut rng_a);
            b.resample(&mut rng_b);
            assert_eq!(a.current(), b.current());
        }
    }

    #[test]
    fn test_resample_replaces_snapshot() {
        let mut weather = Weather::new();
        let mut rng = StdRng::seed_from_u64(1);
        let first = weather.resample(&mut rng).clone();
        let changed = (0..50).any(|_| *weather.resample(&mut rng) != first);
        assert!(changed);
    }

    #[test]
    fn test_value_ranges_and_rounding() {
        let mut weather = Weather::new();
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..2000 {
            let c = weather.resample(&mut rng);
            assert!(c.wind_speed >= 0.0);
            assert!(((c.wind_speed * 10.0) - (c.wind_speed * 10.0).round()).abs() < 1e-6);
            assert!(((c.temperature * 10.0) - (c.temperature * 10.0).round()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_category_frequencies() {
        let mut weather = Weather::new();
        let mut rng = StdRng::seed_from_u64(2024);
        let n = 20_000;
        let (mut low, mut storm, mut overcast, mut holds) = (0, 0, 0, 0);
        for _ in 0..n {
            let c = weather.resample(&mut rng);
            if c.visibility == Visibility::Low {
                low += 1;
            }
            if c.precipitation == Precipitation::Storm {
                storm += 1;
            }
            if c.clouds == Clouds::Overcast {
                overcast += 1;
            }
            if c.requires_holding() {
                holds += 1;
            }
        }
        let share = |count: i32| count as f64 / n as f64;
        assert!((share(low) - 0.10).abs() < 0.015);
        assert!((share(storm) - 0.05).abs() < 0.01);
        assert!((share(overcast) - 0.10).abs() < 0.015);
        // 1 - 0.9 * 0.95
        assert!((share(holds) - 0.145).abs() < 0.015);
    }

    #[test]
    fn test_requires_holding() {
        let mut c = Conditions {
            visibility: Visibility::Clear,
            wind_speed: 10.0,
            precipitation: Precipitation::Light,
            temperature: 20.0,
            clouds: Clouds::Overcast,
        };
        assert!(!c.requires_holding());
        c.precipitation = Precipitation::Storm;
        assert!(c.requires_holding());
        c.precipitation = Precipitation::None;
        c.visibility = Visibility::Low;
        assert!(c.requires_holding());
    }
}
