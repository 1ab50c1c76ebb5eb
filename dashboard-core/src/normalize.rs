//! Provider payload to [`WeatherSnapshot`].

use chrono::{DateTime, Utc};

use crate::{
    catalog::Location,
    error::DashboardError,
    model::WeatherSnapshot,
    provider::ProviderWeatherPayload,
};

/// Merge a provider payload with the location that was asked for.
///
/// Pure. Fails only when a required field is absent.
pub fn normalize(
    payload: &ProviderWeatherPayload,
    requested: &Location,
) -> Result<WeatherSnapshot, DashboardError> {
    let main = payload.main.as_ref().ok_or_else(|| DashboardError::missing("main"))?;
    let wind = payload.wind.as_ref().ok_or_else(|| DashboardError::missing("wind"))?;
    let condition = payload
        .weather
        .first()
        .ok_or_else(|| DashboardError::missing("weather"))?;

    let condition_main = condition
        .main
        .clone()
        .ok_or_else(|| DashboardError::missing("weather[0].main"))?;
    let condition_description = condition
        .description
        .clone()
        .unwrap_or_else(|| condition_main.to_lowercase());

    let observed_at = payload.dt.and_then(unix_to_utc).unwrap_or_else(Utc::now);
    let sys = payload.sys.as_ref();

    Ok(WeatherSnapshot {
        location: *requested,
        location_name: requested.display_name.to_string(),
        region_name: requested.region_code.to_string(),
        provider_place_name: payload.name.clone().filter(|n| !n.is_empty()),
        country_code: sys.and_then(|s| s.country.clone()),
        observed_at,
        utc_offset_secs: payload.timezone.unwrap_or(0),
        temperature: main.temp.ok_or_else(|| DashboardError::missing("main.temp"))?,
        feels_like: main
            .feels_like
            .ok_or_else(|| DashboardError::missing("main.feels_like"))?,
        temp_min: main.temp_min.ok_or_else(|| DashboardError::missing("main.temp_min"))?,
        temp_max: main.temp_max.ok_or_else(|| DashboardError::missing("main.temp_max"))?,
        humidity_percent: main
            .humidity
            .ok_or_else(|| DashboardError::missing("main.humidity"))?,
        pressure_hpa: main.pressure.ok_or_else(|| DashboardError::missing("main.pressure"))?,
        wind_speed: wind.speed.ok_or_else(|| DashboardError::missing("wind.speed"))?,
        wind_degrees: wind.deg.unwrap_or(0.0),
        visibility_meters: payload.visibility,
        condition_main,
        condition_description,
        precipitation_mm: payload.rain.as_ref().and_then(|r| r.one_hour),
        sunrise_epoch: sys.and_then(|s| s.sunrise),
        sunset_epoch: sys.and_then(|s| s.sunset),
    })
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
}
