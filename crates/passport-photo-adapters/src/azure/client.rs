//! Shared blocking HTTP client with bounded retry.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use passport_photo_core::GatewayError;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Header carrying the resource key on every Azure Cognitive Services call.
pub const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

const USER_AGENT: &str = concat!("passport-photo/", env!("CARGO_PKG_VERSION"));

/// Defaults for [`ClientSettings`].
pub mod defaults {
    use std::time::Duration;

    /// Per-request timeout.
    pub const TIMEOUT: Duration = Duration::from_secs(30);
    /// Retries after the first attempt.
    pub const MAX_RETRIES: u32 = 2;
    /// Largest accepted retry count.
    pub const RETRY_LIMIT: u32 = 10;
    /// Delay before the first retry; doubled for every further one.
    pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);
    /// Upper bound on any single retry delay.
    pub const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);
}

/// Transport settings shared by the three gateway clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientSettings {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Retries after the first attempt on transient failures.
    pub max_retries: u32,
    /// Initial retry delay.
    pub retry_backoff: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: defaults::TIMEOUT,
            max_retries: defaults::MAX_RETRIES,
            retry_backoff: defaults::RETRY_BACKOFF,
        }
    }
}

/// Whether a response status is worth another attempt.
fn is_retryable(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
}

/// Exponential backoff for the given attempt, capped at
/// [`defaults::MAX_RETRY_DELAY`].
fn retry_delay(backoff: Duration, attempt: u32) -> Duration {
    backoff
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(defaults::MAX_RETRY_DELAY)
}

/// A `reqwest` blocking client that retries transient failures and maps
/// everything else to [`GatewayError`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    settings: ClientSettings,
}

impl HttpClient {
    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, settings })
    }

    /// Sends the request produced by `build`, retrying transport errors and
    /// retryable statuses with exponential backoff.
    ///
    /// `build` is called once per attempt because a blocking request body
    /// cannot be replayed.
    pub fn send(
        &self,
        service: &'static str,
        build: impl Fn(&Client) -> RequestBuilder,
    ) -> Result<Response, GatewayError> {
        let mut attempt = 0;
        loop {
            let delay = retry_delay(self.settings.retry_backoff, attempt);
            let can_retry = attempt < self.settings.max_retries;

            match build(&self.client).send() {
                Ok(response) if response.status().is_success() => {
                    debug!(service, status = %response.status(), attempt, "request succeeded");
                    return Ok(response);
                }
                Ok(response) if can_retry && is_retryable(response.status()) => {
                    warn!(service, status = %response.status(), attempt, ?delay, "retrying");
                }
                Ok(response) => {
                    let status = response.status().as_u16();
                    let body = response.text().unwrap_or_default();
                    return Err(GatewayError::Status {
                        service,
                        status,
                        body,
                    });
                }
                Err(err) if can_retry => {
                    warn!(service, error = %err, attempt, ?delay, "retrying");
                }
                Err(err) => {
                    return Err(GatewayError::Request {
                        service,
                        message: err.to_string(),
                    });
                }
            }

            thread::sleep(delay);
            attempt += 1;
        }
    }
}

/// Reads a JSON body, mapping decode failures to a contract error.
pub fn parse_json<T: DeserializeOwned>(
    service: &'static str,
    response: Response,
) -> Result<T, GatewayError> {
    let bytes = response.bytes().map_err(|err| GatewayError::Request {
        service,
        message: err.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|err| GatewayError::Response {
        service,
        message: err.to_string(),
    })
}

/// Joins an endpoint and a path without doubling the slash.
pub fn join_url(endpoint: &str, path_and_query: &str) -> String {
    format!("{}/{}", endpoint.trim_end_matches('/'), path_and_query)
}
