//! Presentation-only values derived from a snapshot.
//!
//! Precipitation chance, UV index and air quality are mock heuristics: each
//! weather condition maps to a random band and the band value maps to a
//! level. They are not measurements. The random source is injected so tests
//! can pin it.

use rand::Rng;
use serde::Serialize;

use crate::{
    model::{Condition, WeatherSnapshot},
    units::round_half_up,
};

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UvLevel {
    Low,
    Moderate,
    High,
}

impl UvLevel {
    pub fn from_index(value: u8) -> Self {
        if value > 7 {
            Self::High
        } else if value > 3 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AirQualityLevel {
    Good,
    Moderate,
    Unhealthy,
}

impl AirQualityLevel {
    pub fn from_index(index: u16) -> Self {
        if index > 100 {
            Self::Unhealthy
        } else if index > 50 {
            Self::Moderate
        } else {
            Self::Good
        }
    }
}

macro_rules! level_display {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Debug::fmt(self, f)
            }
        }
    };
}

level_display!(UvLevel);
level_display!(AirQualityLevel);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedMetrics {
    /// Not clamped: an explicit rain volume above 5 mm yields more than 100.
    pub precipitation_percent: i64,
    pub uv_index: u8,
    pub uv_level: UvLevel,
    pub air_quality_index: u16,
    pub air_quality_level: AirQualityLevel,
    pub wind_direction: &'static str,
}

pub fn compute<R: Rng + ?Sized>(snapshot: &WeatherSnapshot, rng: &mut R) -> DerivedMetrics {
    let condition = snapshot.condition();
    let uv_index = uv_index(condition, rng);
    let air_quality_index = air_quality_index(condition, rng);

    DerivedMetrics {
        precipitation_percent: precipitation_percent(snapshot.precipitation_mm, condition, rng),
        uv_index,
        uv_level: UvLevel::from_index(uv_index),
        air_quality_index,
        air_quality_level: AirQualityLevel::from_index(air_quality_index),
        wind_direction: wind_direction(snapshot.wind_degrees),
    }
}

/// Explicit volume wins: `round(mm * 20)`. Otherwise a band per condition.
pub fn precipitation_percent<R: Rng + ?Sized>(
    volume_mm: Option<f64>,
    condition: Condition,
    rng: &mut R,
) -> i64 {
    if let Some(mm) = volume_mm {
        return round_half_up(mm * 20.0);
    }

    let (base, spread) = match condition {
        Condition::Rain => (50.0, 50.0),
        Condition::Drizzle => (20.0, 30.0),
        Condition::Snow => (40.0, 40.0),
        Condition::Thunderstorm => (70.0, 30.0),
        _ => return 0,
    };
    round_half_up(rng.gen_range(0.0..1.0) * spread + base)
}

pub fn uv_index<R: Rng + ?Sized>(condition: Condition, rng: &mut R) -> u8 {
    match condition {
        Condition::Clear => rng.gen_range(5..10),
        Condition::Clouds => rng.gen_range(2..6),
        _ => rng.gen_range(1..3),
    }
}

pub fn air_quality_index<R: Rng + ?Sized>(condition: Condition, rng: &mut R) -> u16 {
    match condition {
        Condition::Rain | Condition::Drizzle => rng.gen_range(10..40),
        Condition::Clear => rng.gen_range(20..60),
        _ => rng.gen_range(40..90),
    }
}

/// Eight-point compass label; wraps past 360 and below 0.
pub fn wind_direction(degrees: f64) -> &'static str {
    let index = round_half_up(degrees / 45.0).rem_euclid(8) as usize;
    COMPASS[index]
}
