//! Shared HTTP plumbing for upstream adapters
//!
//! Every upstream client owns an `UpstreamClient`: a reqwest client with a
//! request timeout plus a bounded retry loop.
//!
//! Retry policy per attempt:
//! - 429: back off `base * 2^(attempt + 1)` and retry
//! - 5xx / transport failure: back off `base * (attempt + 1)` and retry
//! - other 4xx: fail immediately
//!
//! No delay is taken after the final attempt.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ports::{PortResult, UpstreamError};

/// Timeout and retry settings shared by all upstream clients
#[derive(Debug, Clone, PartialEq)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Base delay for backoff (milliseconds)
    pub retry_base_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 2,
            retry_base_delay_ms: 500,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Malformed(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// Delay before the next attempt after a rate-limit response
pub fn rate_limit_backoff(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(2u64.saturating_pow(attempt + 1)))
}

/// Delay before the next attempt after a server or transport error
pub fn linear_backoff(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(attempt as u64 + 1))
}

/// Named reqwest client with timeout and retry
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    name: String,
    config: HttpConfig,
    http: Client,
}

impl UpstreamClient {
    pub fn new(name: impl Into<String>, config: HttpConfig) -> PortResult<Self> {
        let http = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            name: name.into(),
            config,
            http,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// GET `url` with query parameters and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> PortResult<T> {
        let response = self.execute(|| self.http.get(url).query(query)).await?;
        self.decode(response).await
    }

    /// POST a JSON body to `url` and decode the JSON response
    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> PortResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.execute(|| self.http.post(url).json(body)).await?;
        self.decode(response).await
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response) -> PortResult<T> {
        let body = response.text().await?;
        tracing::debug!(source = %self.name, bytes = body.len(), "Upstream response received");
        serde_json::from_str(&body).map_err(|e| {
            UpstreamError::Malformed(format!("{} response did not parse: {}", self.name, e))
        })
    }

    /// Send the request built by `build`, retrying per the module policy
    async fn execute<F>(&self, build: F) -> PortResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let attempts = self.config.max_attempts.max(1);
        let base = self.config.retry_base_delay_ms;
        let mut last_error = None;

        for attempt in 0..attempts {
            let is_last = attempt + 1 == attempts;

            match build().send().await {
                Ok(response) => {
                    let status = response.status();

                    if status == StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(UpstreamError::RateLimited(self.name.clone()));
                        if !is_last {
                            let backoff = rate_limit_backoff(base, attempt);
                            tracing::warn!(
                                source = %self.name,
                                "Rate limited (429), backing off for {:?} (attempt {}/{})",
                                backoff,
                                attempt + 1,
                                attempts
                            );
                            tokio::time::sleep(backoff).await;
                        }
                        continue;
                    }

                    if status.is_server_error() {
                        last_error = Some(UpstreamError::status(&self.name, status.as_u16()));
                        if !is_last {
                            let backoff = linear_backoff(base, attempt);
                            tracing::warn!(source = %self.name, %status, "Server error, retrying in {:?}", backoff);
                            tokio::time::sleep(backoff).await;
                        }
                        continue;
                    }

                    if !status.is_success() {
                        return Err(UpstreamError::status(&self.name, status.as_u16()));
                    }

                    return Ok(response);
                }
                Err(e) => {
                    tracing::debug!(source = %self.name, error = %e, attempt = attempt + 1, "Request failed");
                    last_error = Some(UpstreamError::from(e));
                    if !is_last {
                        tokio::time::sleep(linear_backoff(base, attempt)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            UpstreamError::Transport(format!("{}: max retries exceeded", self.name))
        }))
    }
}
