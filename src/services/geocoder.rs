use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::GeoPoint;

/// Errors that can occur when talking to the geocoding proxy
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Geocode attempt timed out after {0:?}")]
    Timeout(Duration),

    #[error("Geocoding proxy returned status {0}")]
    Status(StatusCode),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

impl GeocodeError {
    /// Only transport failures (connection errors, attempt timeouts) are retried.
    /// Any HTTP status from the proxy is an answer.
    pub fn is_retryable(&self) -> bool {
        match self {
            GeocodeError::RequestError(e) => !e.is_decode() && !e.is_builder() && !e.is_status(),
            GeocodeError::Timeout(_) => true,
            GeocodeError::Status(_) | GeocodeError::InvalidResponse(_) => false,
        }
    }
}

/// Retry and timeout policy for geocode lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Backoff before the given retry (1-based): base, 2x base, 4x base...
    pub fn delay_before(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// Source of backoff sleeps, swapped for a fake in tests
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Clock backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Candidate location returned by the provider, best match first
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(alias = "lng", deserialize_with = "number_or_string")]
    pub lon: f64,
    #[serde(alias = "display_name", default)]
    pub label: Option<String>,
}

impl GeocodeCandidate {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lon)
    }
}

/// Providers commonly send coordinates as strings
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("coordinate out of f64 range")),
        Value::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        other => Err(serde::de::Error::custom(format!(
            "expected coordinate, got {}",
            other
        ))),
    }
}

/// One round trip to the geocoding provider
#[async_trait]
pub trait GeocodeTransport: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError>;
}

/// Transport calling the geocoding proxy over HTTP
///
/// `GET {endpoint}?q=<address>`; the body is either a JSON array of candidates
/// or an object with a `results` array.
pub struct HttpGeocodeTransport {
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
    client: Client,
}

impl HttpGeocodeTransport {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key: api_key.filter(|key| !key.is_empty()),
            timeout,
            client,
        })
    }
}

#[async_trait]
impl GeocodeTransport for HttpGeocodeTransport {
    async fn lookup(&self, address: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(address));

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GeocodeError::Timeout(self.timeout)
            } else {
                GeocodeError::RequestError(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let json: Value = response.json().await?;

        let results = match json {
            Value::Array(_) => json,
            Value::Object(mut obj) => obj
                .remove("results")
                .ok_or_else(|| GeocodeError::InvalidResponse("Missing results array".into()))?,
            _ => return Err(GeocodeError::InvalidResponse("Expected array or object".into())),
        };

        serde_json::from_value(results)
            .map_err(|e| GeocodeError::InvalidResponse(format!("Failed to parse candidates: {}", e)))
    }
}

/// Address to coordinates lookup with per-attempt timeout and exponential backoff
///
/// Holds no cache and no request identity. Callers debounce and discard stale
/// results themselves.
#[derive(Clone)]
pub struct Geocoder {
    transport: Arc<dyn GeocodeTransport>,
    clock: Arc<dyn Clock>,
    policy: RetryPolicy,
}

impl Geocoder {
    pub fn new(transport: Arc<dyn GeocodeTransport>, policy: RetryPolicy) -> Self {
        Self::with_clock(transport, Arc::new(TokioClock), policy)
    }

    pub fn with_clock(
        transport: Arc<dyn GeocodeTransport>,
        clock: Arc<dyn Clock>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            transport,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Resolve an address to the provider's first candidate
    ///
    /// Blank input, zero results and exhausted retries all resolve to `None`.
    pub async fn geocode(&self, address: &str) -> Option<GeoPoint> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        let candidates = match self.lookup_with_retry(address).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Geocoding '{}' failed: {}", address, e);
                return None;
            }
        };

        let Some(first) = candidates.first() else {
            tracing::debug!("No geocode results for '{}'", address);
            return None;
        };

        let point = first.point();
        if !point.is_valid() {
            tracing::warn!(
                "Geocoder returned out-of-range coordinates ({}, {}) for '{}'",
                point.lat,
                point.lon,
                address
            );
            return None;
        }

        tracing::debug!(
            "Geocoded '{}' to ({}, {}) {}",
            address,
            point.lat,
            point.lon,
            first.label.as_deref().unwrap_or("")
        );

        Some(point)
    }

    async fn lookup_with_retry(&self, address: &str) -> Result<Vec<GeocodeCandidate>, GeocodeError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;

            let result = match tokio::time::timeout(
                self.policy.attempt_timeout,
                self.transport.lookup(address),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GeocodeError::Timeout(self.policy.attempt_timeout)),
            };

            match result {
                Ok(candidates) => return Ok(candidates),
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.delay_before(attempt);
                    tracing::warn!(
                        "Geocode attempt {}/{} failed: {}, retrying in {:?}",
                        attempt,
                        max_attempts,
                        e,
                        delay
                    );
                    self.clock.sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
