use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::{error::DashboardError, http::HttpPolicy};

pub const DEFAULT_GEOCODING_URL: &str = "https://api.openweathermap.org/geo/1.0/direct";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Resolves a textual place to coordinates.
#[async_trait]
pub trait GeocodingClient: Send + Sync + Debug {
    async fn resolve(&self, lookup_name: &str, region_code: &str) -> Result<Coordinates, DashboardError>;
}

/// Checks the input constraints shared by every geocoder: a non-empty name
/// and an ISO 3166 style tag, either `CC` or `CC-SUB` with a 1-3 character
/// alphanumeric subdivision.
pub fn validate_query(lookup_name: &str, region_code: &str) -> Result<(), DashboardError> {
    if lookup_name.trim().is_empty() {
        return Err(DashboardError::InvalidInput("lookup name is empty".into()));
    }

    let (country, subdivision) = match region_code.split_once('-') {
        Some((country, sub)) => (country, Some(sub)),
        None => (region_code, None),
    };

    let country_ok = country.len() == 2 && country.chars().all(|c| c.is_ascii_alphabetic());
    let sub_ok = subdivision.is_none_or(|sub| {
        (1..=3).contains(&sub.len()) && sub.chars().all(|c| c.is_ascii_alphanumeric())
    });

    if country_ok && sub_ok {
        Ok(())
    } else {
        Err(DashboardError::InvalidInput(format!(
            "region code '{region_code}' is not an ISO 3166 tag"
        )))
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    api_key: String,
    base_url: String,
    policy: HttpPolicy,
    http: Client,
}

impl OpenWeatherGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_GEOCODING_URL.to_string(), HttpPolicy::default())
    }

    pub fn with_endpoint(api_key: String, base_url: String, policy: HttpPolicy) -> Self {
        Self {
            api_key,
            base_url,
            policy,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    lat: f64,
    lon: f64,
}

#[async_trait]
impl GeocodingClient for OpenWeatherGeocoder {
    async fn resolve(&self, lookup_name: &str, region_code: &str) -> Result<Coordinates, DashboardError> {
        validate_query(lookup_name, region_code)?;

        let q = format!("{},{}", lookup_name.trim(), region_code.trim());
        tracing::debug!(query = %q, "geocoding");

        let request = self.http.get(&self.base_url).query(&[
            ("q", q.as_str()),
            ("limit", "1"),
            ("appid", self.api_key.as_str()),
        ]);

        let res = self.policy.send(request, "geocoding").await?;
        let status = res.status();
        let body = res.text().await.map_err(|err| {
            DashboardError::Transport(format!("geocoding body: {}", err.without_url()))
        })?;

        if !status.is_success() {
            // Error bodies are objects, never a match list.
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
                .unwrap_or_default();
            return Err(DashboardError::Provider {
                code: status.as_u16(),
                message,
            });
        }

        let matches: Vec<GeoMatch> = serde_json::from_str(&body)
            .map_err(|err| DashboardError::MalformedResponse(format!("geocoding JSON: {err}")))?;

        let first = matches.first().ok_or(DashboardError::NotFound)?;
        tracing::debug!(lat = first.lat, lon = first.lon, "geocoded {q}");

        Ok(Coordinates {
            latitude: first.lat,
            longitude: first.lon,
        })
    }
}
