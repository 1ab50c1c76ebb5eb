//! Dashboard state and the select/refresh pipeline that drives it.
//!
//! [`DashboardState`] is a plain value with consuming transition functions,
//! so every state change can be exercised without I/O. [`Dashboard`] wraps
//! it with the geocoding and weather clients and applies transitions around
//! the network calls.
//!
//! Overlapping selections are not cancelled. With
//! [`StalePolicy::LastWriteWins`] whichever response lands last is shown,
//! even if it belongs to an older selection. [`StalePolicy::LatestOnly`]
//! tags each request with a generation and drops completions that are not
//! the newest.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDateTime};
use parking_lot::Mutex;
use rand::Rng;

use crate::{
    catalog::Location,
    config::Config,
    error::DashboardError,
    forecast::{self, Forecast},
    geocode::{GeocodingClient, OpenWeatherGeocoder},
    history::SelectionHistory,
    metrics::{self, DerivedMetrics},
    model::WeatherSnapshot,
    normalize::normalize,
    provider::{OpenWeatherClient, WeatherClient},
    units::TemperatureUnit,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StalePolicy {
    /// Apply every completion in arrival order.
    #[default]
    LastWriteWins,
    /// Apply a completion only if no newer request has been issued since.
    LatestOnly,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    /// User-visible message. The previous snapshot, if any, is kept.
    Failed(String),
}

/// Borrowed view of the state machine as the presentation layer sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Idle,
    Loading,
    Ready(&'a WeatherSnapshot),
    Failed {
        message: &'a str,
        last_known: Option<&'a WeatherSnapshot>,
    },
}

/// Handed out when a request starts; returned when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub generation: u64,
    pub location: Location,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    phase: Phase,
    snapshot: Option<Arc<WeatherSnapshot>>,
    history: SelectionHistory,
    last_updated: Option<DateTime<Local>>,
    unit: TemperatureUnit,
    issued: u64,
    policy: StalePolicy,
}

impl DashboardState {
    pub fn new(policy: StalePolicy, unit: TemperatureUnit) -> Self {
        Self {
            policy,
            unit,
            ..Self::default()
        }
    }

    /// Idle, Ready or Failed to Loading. Also valid while already Loading.
    pub fn begin(mut self, location: Location) -> (Self, Ticket) {
        self.issued += 1;
        self.phase = Phase::Loading;
        let ticket = Ticket {
            generation: self.issued,
            location,
        };
        (self, ticket)
    }

    /// Apply the outcome of the request identified by `ticket`.
    pub fn complete(
        mut self,
        ticket: Ticket,
        outcome: Result<WeatherSnapshot, DashboardError>,
        now: DateTime<Local>,
    ) -> Self {
        if self.policy == StalePolicy::LatestOnly && ticket.generation != self.issued {
            tracing::warn!(
                generation = ticket.generation,
                latest = self.issued,
                region = ticket.location.region_code,
                "discarding stale response"
            );
            return self;
        }

        match outcome {
            Ok(snapshot) => {
                tracing::info!(region = ticket.location.region_code, "weather updated");
                self.snapshot = Some(Arc::new(snapshot));
                self.history.push(ticket.location);
                self.last_updated = Some(now);
                self.phase = Phase::Ready;
            }
            Err(err) => {
                tracing::warn!(region = ticket.location.region_code, "weather fetch failed: {err}");
                self.phase = Phase::Failed(err.user_message());
            }
        }
        self
    }

    pub fn with_unit(mut self, unit: TemperatureUnit) -> Self {
        self.unit = unit;
        self
    }

    pub fn view(&self) -> View<'_> {
        match &self.phase {
            Phase::Idle => View::Idle,
            Phase::Loading => View::Loading,
            Phase::Ready => match self.snapshot.as_deref() {
                Some(snapshot) => View::Ready(snapshot),
                None => View::Idle,
            },
            Phase::Failed(message) => View::Failed {
                message: message.as_str(),
                last_known: self.snapshot.as_deref(),
            },
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Latest successful snapshot, retained across failures.
    pub fn snapshot(&self) -> Option<&Arc<WeatherSnapshot>> {
        self.snapshot.as_ref()
    }

    /// Location to re-fetch on refresh.
    pub fn loaded_location(&self) -> Option<Location> {
        self.snapshot.as_ref().map(|s| s.location)
    }

    pub fn history(&self) -> &SelectionHistory {
        &self.history
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }
}

/// Geocode, fetch, normalize.
#[derive(Debug, Clone)]
pub struct Pipeline {
    geocoder: Arc<dyn GeocodingClient>,
    weather: Arc<dyn WeatherClient>,
}

impl Pipeline {
    pub fn new(geocoder: Arc<dyn GeocodingClient>, weather: Arc<dyn WeatherClient>) -> Self {
        Self { geocoder, weather }
    }

    /// OpenWeather clients for the configured credential, endpoints and policy.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        let policy = config.http_policy();

        Ok(Self::new(
            Arc::new(OpenWeatherGeocoder::with_endpoint(
                api_key.clone(),
                config.geocoding_url.clone(),
                policy,
            )),
            Arc::new(OpenWeatherClient::with_endpoint(
                api_key,
                config.weather_url.clone(),
                policy,
            )),
        ))
    }

    pub async fn fetch(&self, location: &Location) -> Result<WeatherSnapshot, DashboardError> {
        let coordinates = self
            .geocoder
            .resolve(location.lookup_name, location.region_code)
            .await?;
        let payload = self.weather.fetch_current(coordinates).await?;
        normalize(&payload, location)
    }
}

/// Owns the dashboard state and runs the pipeline on selection.
///
/// Shareable across tasks; the state lock is never held across an await.
#[derive(Debug)]
pub struct Dashboard {
    pipeline: Pipeline,
    state: Mutex<DashboardState>,
}

impl Dashboard {
    pub fn new(pipeline: Pipeline, policy: StalePolicy, unit: TemperatureUnit) -> Self {
        Self {
            pipeline,
            state: Mutex::new(DashboardState::new(policy, unit)),
        }
    }

    /// Apply `f` under the lock and return the resulting phase.
    fn transition(&self, f: impl FnOnce(DashboardState) -> DashboardState) -> Phase {
        let mut guard = self.state.lock();
        let current = std::mem::take(&mut *guard);
        *guard = f(current);
        guard.phase.clone()
    }

    /// Fetch weather for `location` and fold the outcome into the state.
    /// Returns the phase right after this request's completion was applied.
    pub async fn select(&self, location: Location) -> Phase {
        let ticket = {
            let mut guard = self.state.lock();
            let (next, ticket) = std::mem::take(&mut *guard).begin(location);
            *guard = next;
            ticket
        };
        tracing::info!(
            region = location.region_code,
            generation = ticket.generation,
            "loading weather"
        );

        let outcome = self.pipeline.fetch(&location).await;

        self.transition(|state| state.complete(ticket, outcome, Local::now()))
    }

    /// Re-run [`Dashboard::select`] for the loaded location. `None` when
    /// nothing has loaded yet.
    pub async fn refresh(&self) -> Option<Phase> {
        let location = self.state.lock().loaded_location()?;
        Some(self.select(location).await)
    }

    /// Copy of the current state; the snapshot itself is shared.
    pub fn state(&self) -> DashboardState {
        self.state.lock().clone()
    }

    pub fn phase(&self) -> Phase {
        self.state.lock().phase.clone()
    }

    pub fn snapshot(&self) -> Option<Arc<WeatherSnapshot>> {
        self.state.lock().snapshot.clone()
    }

    pub fn history(&self) -> Vec<Location> {
        self.state.lock().history.iter().copied().collect()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.state.lock().last_updated
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.state.lock().unit
    }

    pub fn set_unit(&self, unit: TemperatureUnit) {
        self.transition(|state| state.with_unit(unit));
    }

    pub fn toggle_unit(&self) -> TemperatureUnit {
        let next = self.unit().toggled();
        self.set_unit(next);
        next
    }

    /// Recomputed on every call; nothing is cached.
    pub fn derived_metrics<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<DerivedMetrics> {
        self.snapshot().map(|s| metrics::compute(&s, rng))
    }

    pub fn forecast<R: Rng + ?Sized>(&self, now: NaiveDateTime, rng: &mut R) -> Option<Forecast> {
        self.snapshot().map(|s| forecast::synthesize(&s, now, rng))
    }
}
