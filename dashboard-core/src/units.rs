//! Temperature conversion and display formatting.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::wind_direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }
}

impl std::fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl TryFrom<&str> for TemperatureUnit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "C" | "CELSIUS" => Ok(Self::Celsius),
            "F" | "FAHRENHEIT" => Ok(Self::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown temperature unit '{value}'. Use C or F."
            )),
        }
    }
}

/// Round to the nearest integer, halves towards positive infinity.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Convert a Celsius reading for display in `unit`.
pub fn convert(celsius: f64, unit: TemperatureUnit) -> i64 {
    match unit {
        TemperatureUnit::Celsius => round_half_up(celsius),
        TemperatureUnit::Fahrenheit => round_half_up(celsius * 9.0 / 5.0 + 32.0),
    }
}

pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{}°{}", convert(celsius, unit), unit.symbol())
}

pub fn format_visibility(meters: u32) -> String {
    format!("{:.1} km", f64::from(meters) / 1000.0)
}

pub fn format_wind(speed: f64, degrees: f64) -> String {
    format!("{} km/h ({})", round_half_up(speed), wind_direction(degrees))
}

/// `HH:MM` for a unix timestamp at the given UTC offset.
pub fn format_clock(epoch_secs: i64, utc_offset_secs: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(utc_offset_secs)?;
    let at = DateTime::<Utc>::from_timestamp(epoch_secs, 0)?;
    Some(at.with_timezone(&offset).format("%H:%M").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freezing_and_boiling_points() {
        assert_eq!(convert(0.0, TemperatureUnit::Fahrenheit), 32);
        assert_eq!(convert(100.0, TemperatureUnit::Fahrenheit), 212);
        assert_eq!(convert(-40.0, TemperatureUnit::Fahrenheit), -40);
    }

    #[test]
    fn celsius_is_rounded() {
        assert_eq!(convert(29.4, TemperatureUnit::Celsius), 29);
        assert_eq!(convert(29.5, TemperatureUnit::Celsius), 30);
        assert_eq!(convert(-0.4, TemperatureUnit::Celsius), 0);
        // halves go up, not away from zero
        assert_eq!(convert(-2.5, TemperatureUnit::Celsius), -2);
    }

    #[test]
    fn unit_toggles_and_parses() {
        assert_eq!(TemperatureUnit::Celsius.toggled(), TemperatureUnit::Fahrenheit);
        assert_eq!(TemperatureUnit::Fahrenheit.toggled(), TemperatureUnit::Celsius);
        assert_eq!(TemperatureUnit::try_from("f").ok(), Some(TemperatureUnit::Fahrenheit));
        assert!(TemperatureUnit::try_from("kelvin").is_err());
    }

    #[test]
    fn display_strings() {
        assert_eq!(format_temperature(21.6, TemperatureUnit::Celsius), "22°C");
        assert_eq!(format_visibility(10000), "10.0 km");
        assert_eq!(format_visibility(2500), "2.5 km");
        assert_eq!(format_wind(3.6, 220.0), "4 km/h (SW)");
    }

    #[test]
    fn clock_uses_location_offset() {
        // 2023-11-14T22:13:20Z
        assert_eq!(format_clock(1_700_000_000, 0).as_deref(), Some("22:13"));
        assert_eq!(format_clock(1_700_000_000, 3600).as_deref(), Some("23:13"));
        assert_eq!(format_clock(1_700_000_000, 100_000), None);
    }
}
