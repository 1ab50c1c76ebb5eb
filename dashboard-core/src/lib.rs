//! Core library for the `weather-dash` dashboard.
//!
//! This crate defines:
//! - The catalog of selectable locations
//! - Geocoding and current-weather clients for OpenWeather
//! - Snapshot normalization and the mock derived metrics / forecast
//! - The dashboard state controller and its selection history
//! - Configuration & credentials handling
//!
//! It is used by `dashboard-cli`, but holds no terminal code of its own.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod history;
pub mod http;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod units;

pub use catalog::Location;
pub use config::Config;
pub use controller::{Dashboard, DashboardState, Phase, Pipeline, StalePolicy, View};
pub use error::DashboardError;
pub use geocode::{Coordinates, GeocodingClient, OpenWeatherGeocoder};
pub use http::HttpPolicy;
pub use metrics::DerivedMetrics;
pub use model::{Condition, WeatherSnapshot};
pub use provider::{OpenWeatherClient, ProviderWeatherPayload, WeatherClient};
pub use units::TemperatureUnit;
