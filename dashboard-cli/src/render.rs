//! Plain-text rendering of the dashboard tabs.

use chrono::{DateTime, Local};
use dashboard_core::{
    DerivedMetrics, TemperatureUnit, WeatherSnapshot,
    forecast::Forecast,
    units::{
        convert, format_clock, format_temperature, format_visibility, format_wind, round_half_up,
    },
};

pub fn header(snapshot: &WeatherSnapshot, last_updated: Option<DateTime<Local>>) -> String {
    let place = snapshot
        .provider_place_name
        .as_deref()
        .unwrap_or(snapshot.location.lookup_name);
    let mut out = format!(
        "{place}, {} ({})\n",
        snapshot.location_name, snapshot.region_name
    );
    if let Some(at) = last_updated {
        out.push_str(&format!("Last updated: {}\n", at.format("%H:%M:%S")));
    }
    out
}

/// Shown above a snapshot kept from before a failed fetch.
pub fn stale_banner(snapshot: &WeatherSnapshot) -> String {
    format!("[stale] Showing last known weather for {}\n", snapshot.location_name)
}

pub fn current(snapshot: &WeatherSnapshot, metrics: &DerivedMetrics, unit: TemperatureUnit) -> String {
    [
        format!(
            "{}  {}",
            format_temperature(snapshot.temperature, unit),
            capitalize(&snapshot.condition_description)
        ),
        format!(
            "Feels like {}°   H {}°  L {}°",
            convert(snapshot.feels_like, unit),
            convert(snapshot.temp_max, unit),
            convert(snapshot.temp_min, unit),
        ),
        format!("Humidity       {}%", snapshot.humidity_percent),
        format!("Wind           {}", format_wind(snapshot.wind_speed, snapshot.wind_degrees)),
        format!("Precipitation  {}%", metrics.precipitation_percent),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

pub fn details(snapshot: &WeatherSnapshot, metrics: &DerivedMetrics, unit: TemperatureUnit) -> String {
    let clock = |epoch: Option<i64>| {
        epoch
            .and_then(|e| format_clock(e, snapshot.utc_offset_secs))
            .unwrap_or_else(|| "--:--".to_string())
    };
    let visibility = snapshot
        .visibility_meters
        .map(format_visibility)
        .unwrap_or_else(|| "n/a".to_string());

    [
        format!("Feels like     {}", format_temperature(snapshot.feels_like, unit)),
        format!("Humidity       {}%", snapshot.humidity_percent),
        format!(
            "Wind           {} km/h ({}, {}°)",
            round_half_up(snapshot.wind_speed),
            metrics.wind_direction,
            snapshot.wind_degrees
        ),
        format!("Visibility     {visibility}"),
        format!("Pressure       {} hPa", snapshot.pressure_hpa),
        format!("UV index       {} ({})", metrics.uv_index, metrics.uv_level),
        format!(
            "Air quality    {} ({})",
            metrics.air_quality_index, metrics.air_quality_level
        ),
        format!("Sunrise        {}", clock(snapshot.sunrise_epoch)),
        format!("Sunset         {}", clock(snapshot.sunset_epoch)),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}

pub fn forecast(forecast: &Forecast, unit: TemperatureUnit) -> String {
    let mut out = String::from("Next 24 hours\n");
    for hour in forecast.hourly.iter().step_by(3) {
        out.push_str(&format!(
            "  {:>5}  {:>5}  {:<12} {:>3}%  humidity {:>3}%\n",
            hour.label,
            format_temperature(hour.temperature, unit),
            hour.condition,
            hour.precipitation_percent,
            round_half_up(hour.humidity_percent)
        ));
    }

    out.push_str("\n5-day outlook\n");
    for day in &forecast.daily {
        out.push_str(&format!(
            "  {:<10} {:>5} / {:<5} {:<8} {:>3}%\n",
            day.label,
            format_temperature(day.high, unit),
            format_temperature(day.low, unit),
            day.condition,
            day.precipitation_percent
        ));
    }
    out
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
