//! Blocking HTTP client shared by every provider.
//!
//! Wraps `reqwest::blocking` with a timeout, bounded exponential-backoff
//! retries and a per-host [`CircuitBreaker`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::circuit_breaker::CircuitBreaker;
use super::provider::ProviderError;

const USER_AGENT: &str = concat!("confluence/", env!("CARGO_PKG_VERSION"));

/// How a response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    /// 403: host is banning us; open the breaker.
    Forbidden,
    /// 429: counts as a failure, retried.
    RateLimited,
    Unauthorized,
    NotFound,
    /// Other 4xx: the request itself is wrong, not retried.
    ClientError,
    /// 5xx and anything unexpected: counts as a failure, retried.
    ServerError,
}

pub fn classify_status(status: u16) -> StatusClass {
    match status {
        200..=299 => StatusClass::Success,
        401 => StatusClass::Unauthorized,
        403 => StatusClass::Forbidden,
        404 => StatusClass::NotFound,
        429 => StatusClass::RateLimited,
        400..=499 => StatusClass::ClientError,
        _ => StatusClass::ServerError,
    }
}

/// Delay before retry `attempt` (1-based): `base * 2^(attempt - 1)`.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Parse a decimal that a venue sends as a JSON string (`"0.00010000"`).
pub(crate) fn parse_decimal(field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| {
            ProviderError::ResponseFormatChanged(format!("{field}: not a number: {raw:?}"))
        })
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    breaker: Arc<CircuitBreaker>,
    max_retries: u32,
    base_delay: Duration,
}

impl HttpClient {
    pub fn new(host: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            breaker: Arc::new(CircuitBreaker::for_host(host)),
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        })
    }

    pub fn with_retries(mut self, max_retries: u32, base_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.base_delay = base_delay;
        self
    }

    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// GET `url` and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let response = self.send_with_retry(url, || {
            let mut request = self.client.get(url).query(query);
            for (name, value) in headers {
                request = request.header(*name, value.as_str());
            }
            request
        })?;
        response
            .json::<T>()
            .map_err(|e| ProviderError::ResponseFormatChanged(format!("{url}: {e}")))
    }

    /// POST a JSON body, ignoring the response body.
    pub fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<(), ProviderError> {
        self.send_with_retry(url, || self.client.post(url).json(body))
            .map(|_| ())
    }

    fn send_with_retry(
        &self,
        url: &str,
        build: impl Fn() -> RequestBuilder,
    ) -> Result<Response, ProviderError> {
        let tripped = || ProviderError::CircuitBreakerTripped {
            host: self.breaker.name().to_string(),
        };
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.base_delay, attempt);
                debug!(url, attempt, ?delay, "retrying request");
                std::thread::sleep(delay);
            }
            if !self.breaker.is_allowed() {
                return Err(tripped());
            }

            let response = match build().send() {
                Ok(response) => response,
                Err(e) => {
                    self.breaker.record_failure();
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(ProviderError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(ProviderError::NetworkUnreachable(e.to_string()));
                }
            };

            let status = response.status().as_u16();
            match classify_status(status) {
                StatusClass::Success => {
                    self.breaker.record_success();
                    return Ok(response);
                }
                StatusClass::Forbidden => {
                    self.breaker.trip();
                    return Err(tripped());
                }
                StatusClass::RateLimited => {
                    self.breaker.record_failure();
                    let retry_after_secs = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|v| v.parse::<u64>().ok())
                        .unwrap_or(60);
                    warn!(url, retry_after_secs, "rate limited");
                    last_error = Some(ProviderError::RateLimited { retry_after_secs });
                }
                StatusClass::Unauthorized => {
                    return Err(ProviderError::AuthenticationRequired(url.to_string()));
                }
                StatusClass::NotFound => {
                    return Err(ProviderError::NotFound(url.to_string()));
                }
                StatusClass::ClientError => {
                    return Err(ProviderError::Status {
                        status,
                        url: url.to_string(),
                    });
                }
                StatusClass::ServerError => {
                    self.breaker.record_failure();
                    last_error = Some(ProviderError::Status {
                        status,
                        url: url.to_string(),
                    });
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::Other("max retries exceeded".into())))
    }
}
