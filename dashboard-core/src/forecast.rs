//! Synthesized outlook for the forecast tab.
//!
//! There is no forecast endpoint behind this: every entry is the current
//! temperature plus random variation. Both the random source and the local
//! wall clock are injected.

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::Rng;
use serde::Serialize;

use crate::{model::WeatherSnapshot, units::round_half_up};

pub const DAILY_ENTRIES: usize = 5;
pub const HOURLY_ENTRIES: usize = 24;

const DAILY_CONDITIONS: [&str; 5] = ["Clear", "Clouds", "Rain", "Snow", "Drizzle"];
const HOURLY_CONDITIONS: [&str; 3] = ["Clear", "Clouds", "Rain"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub label: String,
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub condition: &'static str,
    pub precipitation_percent: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyForecast {
    pub label: String,
    pub hour: u32,
    pub temperature: f64,
    pub condition: &'static str,
    pub precipitation_percent: i64,
    /// Observed humidity plus up to ten points either way. Not clamped.
    pub humidity_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub daily: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
}

pub fn synthesize<R: Rng + ?Sized>(
    snapshot: &WeatherSnapshot,
    now: NaiveDateTime,
    rng: &mut R,
) -> Forecast {
    Forecast {
        daily: daily(snapshot.temperature, now, rng),
        hourly: hourly(snapshot, now, rng),
    }
}

fn daily<R: Rng + ?Sized>(base: f64, now: NaiveDateTime, rng: &mut R) -> Vec<DailyForecast> {
    (0..DAILY_ENTRIES)
        .map(|i| {
            let date = now.date() + Duration::days(i as i64);
            let label = if i == 0 {
                "Today".to_string()
            } else {
                weekday_name(date)
            };
            let variation = rng.gen_range(-2.0..2.0);
            let condition = DAILY_CONDITIONS[rng.gen_range(0..DAILY_CONDITIONS.len())];

            DailyForecast {
                label,
                date,
                high: base + variation + 3.0,
                low: base + variation - 5.0,
                condition,
                precipitation_percent: round_half_up(rng.gen_range(0.0..30.0)),
            }
        })
        .collect()
}

fn hourly<R: Rng + ?Sized>(
    snapshot: &WeatherSnapshot,
    now: NaiveDateTime,
    rng: &mut R,
) -> Vec<HourlyForecast> {
    let base = snapshot.temperature;
    let humidity = f64::from(snapshot.humidity_percent);
    let current = now.hour();
    (0..HOURLY_ENTRIES as u32)
        .map(|i| {
            let hour = (current + i) % 24;
            let variation = rng.gen_range(-1.5..1.5);
            let condition = HOURLY_CONDITIONS[rng.gen_range(0..HOURLY_CONDITIONS.len())];
            let night = !(6..=18).contains(&hour);

            HourlyForecast {
                label: if i == 0 {
                    "Now".to_string()
                } else {
                    format!("{hour}:00")
                },
                hour,
                temperature: base + variation + time_of_day_adjustment(hour),
                condition: if night && condition == "Clear" {
                    "Clear Night"
                } else {
                    condition
                },
                precipitation_percent: round_half_up(rng.gen_range(0.0..30.0)),
                humidity_percent: humidity + rng.gen_range(-10.0..10.0),
            }
        })
        .collect()
}

/// Cooler before dawn and in the evening, warmest in the afternoon.
fn time_of_day_adjustment(hour: u32) -> f64 {
    match hour {
        0..=5 => -3.0,
        6..=11 => 1.0,
        12..=16 => 3.0,
        _ => -1.0,
    }
}

fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog, normalize::normalize, provider::ProviderWeatherPayload};
    use rand::{SeedableRng, rngs::StdRng, rngs::mock::StepRng};
    use serde_json::json;

    fn snapshot(temp: f64) -> WeatherSnapshot {
        let payload: ProviderWeatherPayload = serde_json::from_value(json!({
            "cod": 200,
            "main": { "temp": temp, "feels_like": temp, "temp_min": temp, "temp_max": temp,
                      "pressure": 1010, "humidity": 60 },
            "weather": [{ "main": "Clear" }],
            "wind": { "speed": 2.0 }
        }))
        .expect("payload");
        normalize(&payload, &catalog::default_location()).expect("snapshot")
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 30, 0))
            .expect("valid date")
    }

    #[test]
    fn daily_labels_start_with_today() {
        // 2026-10-18 is a Sunday.
        let mut rng = StdRng::seed_from_u64(3);
        let forecast = synthesize(&snapshot(25.0), at(2026, 10, 18, 9), &mut rng);

        let labels: Vec<_> = forecast.daily.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["Today", "Monday", "Tuesday", "Wednesday", "Thursday"]);
        assert_eq!(forecast.daily[4].date, NaiveDate::from_ymd_opt(2026, 10, 22).expect("date"));
    }

    #[test]
    fn daily_spread_follows_base_temperature() {
        let mut rng = StdRng::seed_from_u64(11);
        let forecast = synthesize(&snapshot(20.0), at(2026, 1, 1, 12), &mut rng);

        for day in &forecast.daily {
            assert!((21.0..25.0).contains(&day.high), "high {}", day.high);
            assert!((13.0..17.0).contains(&day.low), "low {}", day.low);
            assert!((day.high - day.low - 8.0).abs() < 1e-9);
            assert!((0..=30).contains(&day.precipitation_percent));
            assert!(DAILY_CONDITIONS.contains(&day.condition));
        }
    }

    #[test]
    fn hourly_wraps_around_midnight() {
        let mut rng = StdRng::seed_from_u64(5);
        let forecast = synthesize(&snapshot(25.0), at(2026, 3, 1, 22), &mut rng);

        assert_eq!(forecast.hourly.len(), HOURLY_ENTRIES);
        assert_eq!(forecast.hourly[0].label, "Now");
        assert_eq!(forecast.hourly[0].hour, 22);
        assert_eq!(forecast.hourly[1].label, "23:00");
        assert_eq!(forecast.hourly[2].label, "0:00");
        assert_eq!(forecast.hourly[23].hour, 21);
    }

    #[test]
    fn clear_hours_at_night_are_relabelled() {
        // StepRng(0, 0) always picks the first condition: "Clear".
        let mut rng = StepRng::new(0, 0);
        let forecast = synthesize(&snapshot(25.0), at(2026, 3, 1, 0), &mut rng);

        for entry in &forecast.hourly {
            let expected = if entry.hour < 6 || entry.hour > 18 {
                "Clear Night"
            } else {
                "Clear"
            };
            assert_eq!(entry.condition, expected, "hour {}", entry.hour);
        }
    }

    #[test]
    fn hourly_temperature_adjusts_by_time_of_day() {
        // Variation pinned to its lower bound of -1.5.
        let mut rng = StepRng::new(0, 0);
        let forecast = synthesize(&snapshot(20.0), at(2026, 3, 1, 0), &mut rng);

        let temp_at = |h: u32| {
            forecast
                .hourly
                .iter()
                .find(|e| e.hour == h)
                .map(|e| e.temperature)
                .expect("hour present")
        };
        assert_eq!(temp_at(3), 15.5);
        assert_eq!(temp_at(9), 19.5);
        assert_eq!(temp_at(14), 21.5);
        assert_eq!(temp_at(20), 17.5);
    }

    #[test]
    fn hourly_humidity_varies_around_observed() {
        let mut rng = StdRng::seed_from_u64(9);
        let forecast = synthesize(&snapshot(25.0), at(2026, 3, 1, 8), &mut rng);

        for entry in &forecast.hourly {
            assert!((50.0..70.0).contains(&entry.humidity_percent), "humidity {}", entry.humidity_percent);
        }

        let mut rng = StepRng::new(0, 0);
        let forecast = synthesize(&snapshot(25.0), at(2026, 3, 1, 8), &mut rng);
        assert!(forecast.hourly.iter().all(|e| e.humidity_percent == 50.0));
    }
}
