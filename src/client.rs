// Availability client: fetches the raw per-room, per-day payload from the inventory API

use crate::availability::AvailabilityResponse;
use crate::trip::{format_date, TripInfo};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError {
        status_code: u16,
        message: String,
        is_retryable: bool,
    },

    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::NetworkError(_) | ApiError::Timeout(_) => true,
            ApiError::ApiResponseError { is_retryable, .. } => *is_retryable,
            ApiError::DecodeError(_) => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub retry_config: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: String::new(),
            timeout_ms: 5000,
            retry_config: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.base_url.trim().is_empty() {
            return Err(ClientError::ConfigError("base_url is empty".to_string()));
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::ConfigError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub backoff_multiplier: f64,
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

// Date window requested for a property; departure is included so its restrictions come back too
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub property_id: String,
    pub arrival: String,
    pub departure: String,
}

impl AvailabilityQuery {
    pub fn for_trip(property_id: &str, trip: &TripInfo) -> Self {
        Self {
            property_id: property_id.to_string(),
            arrival: format_date(trip.helpers.arrival_date),
            departure: trip.departure_key(),
        }
    }
}

#[async_trait]
pub trait AvailabilitySource: Send + Sync + 'static {
    async fn fetch_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityResponse, ApiError>;
}

pub struct HttpAvailabilitySource {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpAvailabilitySource {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        Ok(Self { config, http })
    }

    pub fn availability_url(&self, query: &AvailabilityQuery) -> String {
        format!(
            "{}/properties/{}/availability",
            self.config.base_url.trim_end_matches('/'),
            query.property_id
        )
    }

    async fn fetch_once(&self, query: &AvailabilityQuery) -> Result<AvailabilityResponse, ApiError> {
        let response = self
            .http
            .get(self.availability_url(query))
            .header("X-Api-Key", &self.config.api_key)
            .query(&[("from", &query.arrival), ("to", &query.departure)])
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::ApiResponseError {
                status_code: status.as_u16(),
                message,
                is_retryable: is_retryable_status(status),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        AvailabilityResponse::from_json(&body).map_err(|e| ApiError::DecodeError(e.to_string()))
    }

    fn map_transport_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            ApiError::NetworkError(error.to_string())
        }
    }

    // Helper to calculate exponential backoff with jitter
    pub fn calculate_backoff(retry_attempt: u32, config: &RetryConfig) -> Duration {
        let base_backoff_ms = (config.initial_backoff_ms as f64
            * config.backoff_multiplier.powf(retry_attempt as f64))
        .min(config.max_backoff_ms as f64);

        let jitter = rand::random::<f64>() * config.jitter_factor * base_backoff_ms;
        let backoff_ms = base_backoff_ms * (1.0 - config.jitter_factor / 2.0) + jitter;

        Duration::from_millis(backoff_ms as u64)
    }
}

#[async_trait]
impl AvailabilitySource for HttpAvailabilitySource {
    async fn fetch_availability(
        &self,
        query: &AvailabilityQuery,
    ) -> Result<AvailabilityResponse, ApiError> {
        let retry_config = &self.config.retry_config;
        let mut attempt = 0;

        loop {
            match self.fetch_once(query).await {
                Ok(response) => {
                    debug!(property_id = %query.property_id, attempt, "fetched availability");
                    return Ok(response);
                }
                Err(error) if error.is_retryable() && attempt < retry_config.max_retries => {
                    let backoff = Self::calculate_backoff(attempt, retry_config);
                    warn!(
                        property_id = %query.property_id,
                        attempt,
                        backoff_ms = backoff.as_millis() as u64,
                        %error,
                        "availability fetch failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

#[cfg(test)]
pub mod mock_source {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // Serves a fixed payload, optionally failing the first few calls
    pub struct MockSource {
        response: AvailabilityResponse,
        fail_next_requests: AtomicUsize,
        request_count: AtomicUsize,
        queries: Mutex<Vec<AvailabilityQuery>>,
    }

    impl MockSource {
        pub fn new(response: AvailabilityResponse) -> Self {
            Self {
                response,
                fail_next_requests: AtomicUsize::new(0),
                request_count: AtomicUsize::new(0),
                queries: Mutex::new(Vec::new()),
            }
        }

        pub fn fail_next_requests(&self, count: usize) {
            self.fail_next_requests.store(count, Ordering::SeqCst);
        }

        pub fn request_count(&self) -> usize {
            self.request_count.load(Ordering::SeqCst)
        }

        pub fn queries(&self) -> Vec<AvailabilityQuery> {
            self.queries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AvailabilitySource for MockSource {
        async fn fetch_availability(
            &self,
            query: &AvailabilityQuery,
        ) -> Result<AvailabilityResponse, ApiError> {
            self.request_count.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().unwrap().push(query.clone());

            let fail_count = self.fail_next_requests.load(Ordering::SeqCst);
            if fail_count > 0 {
                self.fail_next_requests
                    .store(fail_count - 1, Ordering::SeqCst);
                return Err(ApiError::ApiResponseError {
                    status_code: 503,
                    message: "Service temporarily unavailable".to_string(),
                    is_retryable: true,
                });
            }

            Ok(self.response.clone())
        }
    }
}
