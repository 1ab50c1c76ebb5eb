use thiserror::Error;

/// Shown for every failure that has no better user-facing wording.
pub const GENERIC_FAILURE: &str = "Failed to fetch weather data. Please try again.";

/// Shown when the provider rejects a request without saying why.
pub const PROVIDER_FALLBACK: &str = "Failed to fetch weather data";

/// Failures of the location-resolution and weather-retrieval pipeline.
///
/// None of these escape the dashboard controller: it folds them into a
/// single message via [`DashboardError::user_message`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    /// Geocoding returned zero matches.
    #[error("location not found")]
    NotFound,

    /// The weather endpoint answered with a non-success status.
    #[error("provider returned status {code}: {message}")]
    Provider { code: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout, body read).
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered, but without the fields we need.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    /// Caller passed something the provider cannot accept.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl DashboardError {
    pub fn missing(field: &str) -> Self {
        Self::MalformedResponse(format!("missing field `{field}`"))
    }

    /// The single string the dashboard displays for this failure.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound => "Location not found".to_string(),
            Self::Provider { message, .. } if message.trim().is_empty() => {
                PROVIDER_FALLBACK.to_string()
            }
            Self::Provider { message, .. } => message.clone(),
            Self::Transport(_) | Self::MalformedResponse(_) | Self::InvalidInput(_) => {
                GENERIC_FAILURE.to_string()
            }
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
