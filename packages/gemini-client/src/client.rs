//! Gemini HTTP client with retry logic and connection pooling

use std::fmt;
use std::future::Future;
use std::time::Duration;

use moodmix_shared_config::GeminiConfig;
use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{GeminiError, GeminiResult};
use crate::models::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};

/// Maximum error body size to prevent memory exhaustion
const MAX_ERROR_BODY_SIZE: usize = 1000;

/// Default retry configuration
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 200;

/// Gemini API client with retry logic and connection pooling
///
/// Retry here is transport-level only: transient failures (timeouts,
/// connection refusals, 5xx) are retried with exponential backoff, while
/// client errors and unusable payloads fail immediately. Callers decide
/// whether a whole operation is worth re-running.
#[derive(Clone)]
pub struct GeminiClient {
    /// HTTP client with connection pool
    http_client: Client,
    /// Configuration
    config: GeminiConfig,
    /// Number of retry attempts for transient failures
    retry_attempts: u32,
    /// Base delay for exponential backoff (milliseconds)
    retry_base_delay_ms: u64,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .field("api_key", &"[REDACTED]")
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiConfig) -> GeminiResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(5)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(GeminiError::Http)?;

        Ok(Self {
            http_client,
            config: config.clone(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        })
    }

    /// Create a client with custom HTTP client (for testing)
    pub fn with_client(config: &GeminiConfig, http_client: Client) -> Self {
        Self {
            http_client,
            config: config.clone(),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }

    /// Set retry configuration
    pub fn with_retry_config(mut self, attempts: u32, base_delay_ms: u64) -> Self {
        self.retry_attempts = attempts;
        self.retry_base_delay_ms = base_delay_ms;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Execute an async operation with retry logic
    async fn with_retry<T, F, Fut>(&self, operation: F) -> GeminiResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = GeminiResult<T>>,
    {
        // 0 retry attempts means run the operation exactly once
        if self.retry_attempts == 0 {
            return operation().await;
        }

        let mut last_error = None;

        for attempt in 0..self.retry_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() {
                        return Err(e);
                    } else if attempt < self.retry_attempts - 1 {
                        let delay = self.retry_base_delay_ms * 2_u64.pow(attempt);
                        warn!(
                            attempt = attempt + 1,
                            max_attempts = self.retry_attempts,
                            delay_ms = delay,
                            error = %e,
                            "Retrying Gemini request after transient error"
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        last_error = Some(e);
                    } else {
                        last_error = Some(e);
                        break;
                    }
                }
            }
        }

        Err(GeminiError::RetriesExhausted {
            attempts: self.retry_attempts,
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string()),
        })
    }

    /// Truncate error body to prevent memory exhaustion
    ///
    /// Handles UTF-8 boundaries safely for multi-byte characters.
    fn truncate_error_body(body: String) -> String {
        if body.len() <= MAX_ERROR_BODY_SIZE {
            return body;
        }

        let truncate_at = body
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|i| *i <= MAX_ERROR_BODY_SIZE)
            .last()
            .unwrap_or(0);

        format!("{}... (truncated)", &body[..truncate_at])
    }

    /// Internal generation call (single request, no retry)
    async fn generate_content_internal(&self, prompt: &str) -> GeminiResult<String> {
        let request = GenerateContentRequest::from_prompt(
            prompt,
            GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        );

        let response = self
            .http_client
            .post(self.config.generate_content_url())
            .query(&[("key", self.config.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GeminiError::ConnectionRefused(self.config.api_url.clone())
                } else if e.is_timeout() {
                    GeminiError::Timeout(self.config.timeout_secs)
                } else {
                    GeminiError::Http(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = Self::truncate_error_body(response.text().await.unwrap_or_default());
            return Err(GeminiError::Api {
                status,
                message: body,
            });
        }

        let generate_response: GenerateContentResponse = response.json().await?;

        match generate_response.first_text() {
            Some(text) => Ok(text.to_string()),
            None => Err(GeminiError::EmptyResponse(
                "no candidate with text content".to_string(),
            )),
        }
    }

    /// Generate text from a prompt with retry logic
    ///
    /// Returns the raw text of the first candidate. The text may wrap a
    /// structured payload in prose; extracting that payload is the caller's
    /// concern.
    pub async fn generate_content(&self, prompt: &str) -> GeminiResult<String> {
        let prompt = prompt.to_string();

        debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending generateContent request"
        );

        let result = self
            .with_retry(|| {
                let prompt = prompt.clone();
                async move { self.generate_content_internal(&prompt).await }
            })
            .await?;

        debug!(response_len = result.len(), "Gemini response received");

        Ok(result)
    }
}
