use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::Location;

/// Coarse weather group, keyed off the provider's `weather[0].main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Snow,
    Thunderstorm,
    Mist,
    Fog,
    Haze,
    /// Anything the dashboard has no special handling for.
    Other,
}

impl Condition {
    pub fn from_main(main: &str) -> Self {
        match main.trim().to_ascii_lowercase().as_str() {
            "clear" => Self::Clear,
            "clouds" => Self::Clouds,
            "rain" => Self::Rain,
            "drizzle" => Self::Drizzle,
            "snow" => Self::Snow,
            "thunderstorm" => Self::Thunderstorm,
            "mist" => Self::Mist,
            "fog" => Self::Fog,
            "haze" => Self::Haze,
            _ => Self::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Clouds => "Clouds",
            Self::Rain => "Rain",
            Self::Drizzle => "Drizzle",
            Self::Snow => "Snow",
            Self::Thunderstorm => "Thunderstorm",
            Self::Mist => "Mist",
            Self::Fog => "Fog",
            Self::Haze => "Haze",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized point-in-time reading for a catalog location.
///
/// Built fresh on each successful fetch and never mutated; the next fetch
/// replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    /// The location that was requested. This, not the provider's place
    /// name, is the snapshot's identity.
    pub location: Location,
    pub location_name: String,
    pub region_name: String,
    /// Place name reported by the provider, for display only.
    pub provider_place_name: Option<String>,
    pub country_code: Option<String>,
    pub observed_at: DateTime<Utc>,
    /// Offset of the location from UTC, in seconds.
    pub utc_offset_secs: i32,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity_percent: u8,
    pub pressure_hpa: f64,
    pub wind_speed: f64,
    pub wind_degrees: f64,
    pub visibility_meters: Option<u32>,
    pub condition_main: String,
    pub condition_description: String,
    /// Rain volume over the last hour, in mm.
    pub precipitation_mm: Option<f64>,
    pub sunrise_epoch: Option<i64>,
    pub sunset_epoch: Option<i64>,
}

impl WeatherSnapshot {
    pub fn condition(&self) -> Condition {
        Condition::from_main(&self.condition_main)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_parsing_is_case_insensitive() {
        assert_eq!(Condition::from_main("Rain"), Condition::Rain);
        assert_eq!(Condition::from_main(" clouds "), Condition::Clouds);
        assert_eq!(Condition::from_main("THUNDERSTORM"), Condition::Thunderstorm);
    }

    #[test]
    fn unknown_conditions_map_to_other() {
        for main in ["Tornado", "Squall", "", "Ash"] {
            assert_eq!(Condition::from_main(main), Condition::Other);
        }
    }
}
