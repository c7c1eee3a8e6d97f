//! Messages API client implementation.
//!
//! This module provides the HTTP client for the external itinerary generation
//! service, an Anthropic-style messages endpoint.

use async_trait::async_trait;
use reqwest::{header, Client};
use std::time::Duration;
use tracing::{debug, trace};

use crate::config::ServiceConfig;
use crate::error::ServiceError;

use super::types::{MessagesRequest, MessagesResponse};
use super::PlanService;

/// API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Wait reported for a 429 without a usable `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Messages API client.
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    /// HTTP client.
    client: Client,
    /// API key.
    api_key: String,
    /// Endpoint URL, `{base_url}/messages`.
    endpoint: String,
    /// Model identifier.
    model: String,
    /// Reply token limit.
    max_tokens: u32,
    /// Retries after the first attempt.
    max_retries: u32,
    /// Base delay between retries in milliseconds.
    retry_delay_ms: u64,
    /// Per-request timeout in milliseconds.
    timeout_ms: u64,
}

impl AnthropicClient {
    /// Creates a new client from service settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(api_key: &str, config: &ServiceConfig) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            endpoint: format!("{}/messages", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
            retry_delay_ms: config.retry_delay_ms,
            timeout_ms: config.timeout_secs.saturating_mul(1000),
        })
    }

    /// Returns the endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a prompt, retrying rate-limit and network failures.
    ///
    /// A rate-limited attempt waits `retry-after` seconds before the next
    /// one; other retries back off linearly from `retry_delay_ms`.
    async fn execute(&self, request: &MessagesRequest) -> Result<String, ServiceError> {
        let mut last_error = None;
        let mut delay = Duration::ZERO;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    "Retry attempt {attempt} of {} in {} ms",
                    self.max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            match self.execute_once(request).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    if e.is_retryable() {
                        debug!("Retryable service error: {e}");
                        delay = self.retry_delay(&e, attempt + 1);
                        last_error = Some(e);
                        continue;
                    }
                    return Err(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ServiceError::network("Max retries exceeded")))
    }

    /// Wait before the given retry attempt.
    fn retry_delay(&self, error: &ServiceError, next_attempt: u32) -> Duration {
        match error {
            ServiceError::RateLimited { retry_after_secs } => {
                Duration::from_secs(*retry_after_secs)
            }
            _ => Duration::from_millis(
                self.retry_delay_ms.saturating_mul(u64::from(next_attempt)),
            ),
        }
    }

    /// Sends a single request.
    async fn execute_once(&self, request: &MessagesRequest) -> Result<String, ServiceError> {
        trace!("Sending messages request to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ServiceError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    ServiceError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();

        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or_default();
            let retry_after = if retry_after == 0 {
                DEFAULT_RETRY_AFTER_SECS
            } else {
                retry_after
            };

            return Err(ServiceError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ServiceError::AuthenticationFailed {
                message: String::from("Invalid API key"),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::api_error(status.as_u16(), body));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::invalid_response(format!("Failed to parse response: {e}")))?;

        let text = body.text();
        if text.trim().is_empty() {
            return Err(ServiceError::invalid_response("No text content in response"));
        }

        trace!("Service replied with {} characters", text.len());
        Ok(text)
    }
}

#[async_trait]
impl PlanService for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn complete(&self, prompt: &str) -> Result<String, ServiceError> {
        let request = MessagesRequest::user(&self.model, self.max_tokens, prompt);
        self.execute(&request).await
    }
}
