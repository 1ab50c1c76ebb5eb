use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;

use crate::{error::DashboardError, geocode::Coordinates, http::HttpPolicy};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Retrieves current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch_current(&self, coordinates: Coordinates) -> Result<ProviderWeatherPayload, DashboardError>;
}

/// Current-conditions payload as the provider sends it.
///
/// Every field is optional here; the normalizer decides which ones are
/// required, so a short payload surfaces as `MalformedResponse` rather than
/// a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderWeatherPayload {
    pub cod: Option<StatusCode>,
    pub message: Option<String>,
    pub name: Option<String>,
    pub dt: Option<i64>,
    pub timezone: Option<i32>,
    pub visibility: Option<u32>,
    pub main: Option<PayloadMain>,
    #[serde(default)]
    pub weather: Vec<PayloadCondition>,
    pub wind: Option<PayloadWind>,
    pub rain: Option<PayloadVolume>,
    pub sys: Option<PayloadSys>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadCondition {
    pub main: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadWind {
    pub speed: Option<f64>,
    pub deg: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadVolume {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PayloadSys {
    pub country: Option<String>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// OpenWeather sends `cod` as a number on success and sometimes as a string
/// on failure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum StatusCode {
    Number(u16),
    Text(String),
}

impl StatusCode {
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            StatusCode::Number(n) => Some(*n),
            StatusCode::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.as_u16() == Some(200)
    }
}

impl ProviderWeatherPayload {
    /// Turn the provider's status into a result.
    pub fn check_status(self) -> Result<Self, DashboardError> {
        let status = self.cod.as_ref().map(|cod| (cod.is_ok(), cod.as_u16()));
        match status {
            Some((true, _)) => Ok(self),
            Some((false, code)) => Err(DashboardError::Provider {
                code: code.unwrap_or_default(),
                message: self.message.unwrap_or_default(),
            }),
            None => Err(DashboardError::missing("cod")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    policy: HttpPolicy,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoint(api_key, DEFAULT_WEATHER_URL.to_string(), HttpPolicy::default())
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

#[async_trait]
impl WeatherClient for OpenWeatherClient {
    async fn fetch_current(&self, coordinates: Coordinates) -> Result<ProviderWeatherPayload, DashboardError> {
        let lat = coordinates.latitude.to_string();
        let lon = coordinates.longitude.to_string();
        tracing::debug!(%lat, %lon, "fetching current weather");

        let request = self.http.get(&self.base_url).query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("units", "metric"),
            ("appid", self.api_key.as_str()),
        ]);

        let res = self.policy.send(request, "weather").await?;
        let status = res.status();
        let body = res.text().await.map_err(|err| {
            DashboardError::Transport(format!("weather body: {}", err.without_url()))
        })?;

        let parsed = serde_json::from_str::<ProviderWeatherPayload>(&body);

        if !status.is_success() {
            // Prefer the provider's own code and message when the error body
            // carries them.
            let (code, message) = match parsed {
                Ok(payload) => (
                    payload
                        .cod
                        .as_ref()
                        .and_then(StatusCode::as_u16)
                        .unwrap_or(status.as_u16()),
                    payload.message.unwrap_or_default(),
                ),
                Err(_) => (status.as_u16(), String::new()),
            };
            tracing::warn!(code, %message, "weather provider rejected request");
            return Err(DashboardError::Provider { code, message });
        }

        parsed
            .map_err(|err| DashboardError::MalformedResponse(format!("weather JSON: {err}")))?
            .check_status()
    }
}
