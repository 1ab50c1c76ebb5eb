//! Request policy shared by the geocoding and weather clients.
//!
//! The baseline is a single attempt with the transport's default timeout.
//! A bounded timeout and one retry for transient transport failures can be
//! switched on through configuration.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};

use crate::error::DashboardError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HttpPolicy {
    /// Per-request timeout; `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
    /// Re-send once after a timeout or connect error.
    pub retry_transient: bool,
}

impl HttpPolicy {
    pub fn hardened(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            retry_transient: true,
        }
    }

    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Send `request`, retrying once when the policy allows and the failure
    /// is transient. Only transport failures come back as errors; HTTP status
    /// handling is left to the caller.
    pub async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, DashboardError> {
        let request = self.prepare(request);
        let retry = if self.retry_transient {
            request.try_clone()
        } else {
            None
        };

        match request.send().await {
            Ok(res) => Ok(res),
            Err(err) if is_transient(&err) => match retry {
                Some(again) => {
                    tracing::warn!("{what} request failed ({}), retrying once", err.without_url());
                    again.send().await.map_err(|err| transport(what, err))
                }
                None => Err(transport(what, err)),
            },
            Err(err) => Err(transport(what, err)),
        }
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn transport(what: &str, err: reqwest::Error) -> DashboardError {
    // reqwest includes the full URL in its messages; strip it so the API
    // key in the query string never reaches logs or error text.
    let err = err.without_url();
    tracing::warn!("{what} request failed: {err}");
    DashboardError::Transport(format!("{what}: {err}"))
}
